//! # PlotKit CLI
//!
//! ```bash
//! # Compile frames to a G-code file
//! plotkit compile frames.txt -o job.gcode
//!
//! # Compile and stream to the simulated device
//! plotkit run layer-*.png
//!
//! # Write the default configuration
//! plotkit config init
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use plotkit::{init_logging, Config, GcodeWriterSink, Job};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// PlotKit - layered raster toolpaths for five-axis positioning devices
#[derive(Parser, Debug)]
#[command(name = "plotkit")]
#[command(about = "Compile bitmap frames into motion commands and stream them to a device", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (.toml or .json); defaults to the user config directory
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile frames and write the commands as G-code
    Compile {
        #[command(flatten)]
        input: FrameInput,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Compile frames and stream them to the simulated device
    Run {
        #[command(flatten)]
        input: FrameInput,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
struct FrameInput {
    /// A `.txt` frame file, or one image file per frame
    #[arg(required = true)]
    frames: Vec<PathBuf>,

    /// Grayscale threshold for image frames (0-255)
    #[arg(long, default_value_t = 128)]
    threshold: u8,

    /// Treat light image pixels as active
    #[arg(long)]
    invert: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    tracing::info!(
        version = plotkit::VERSION,
        built = plotkit::BUILD_DATE,
        "PlotKit starting"
    );

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };

    match cli.command {
        Commands::Compile { input, output } => {
            let job = Job::new(Config::load_or_default(&config_path)?);
            let frames = Job::load_frames(&input.frames, input.threshold, input.invert)?;
            let compiled = job.compile(&frames);

            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            let (report, sink) = job
                .dispatch(compiled, GcodeWriterSink::new(BufWriter::new(file)))
                .await?;
            sink.finish().context("Failed to finish output file")?;

            println!(
                "Wrote {} commands from {} frames to {}",
                report.accepted,
                frames.len(),
                output.display()
            );
        }
        Commands::Run { input } => {
            let job = Job::new(Config::load_or_default(&config_path)?);
            let frames = Job::load_frames(&input.frames, input.threshold, input.invert)?;
            let compiled = job.compile(&frames);
            let stats = compiled.stats.clone();

            let sink = job.config().device.simulated_sink();
            let (report, sink) = job.dispatch(compiled, sink).await?;

            println!(
                "Job {}: {} commands sent ({} plunges), {} backoffs, {} still buffered",
                job.id(),
                report.accepted,
                stats.plunges,
                report.backoffs,
                sink.buffered()
            );
            println!(
                "Bounds: X {:.1}..{:.1}  Y {:.1}..{:.1}  Z {:.1}..{:.1}",
                stats.min[0], stats.max[0], stats.min[1], stats.max[1], stats.min[2], stats.max[2]
            );
        }
        Commands::Config(ConfigCommand::Init { force }) => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                );
            }
            Config::default().save_to_file(&config_path)?;
            println!("Wrote {}", config_path.display());
        }
        Commands::Config(ConfigCommand::Show) => {
            let config = Config::load_or_default(&config_path)?;
            println!("# {}", config_path.display());
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
