//! # PlotKit
//!
//! Compiles layered bitmap frames into motion commands for a five-axis
//! positioning device and streams them to the device under flow control.
//!
//! ## Architecture
//!
//! PlotKit is organized as a workspace with multiple crates:
//!
//! 1. **plotkit-core** - Frames, motion commands, error types
//! 2. **plotkit-camtools** - Raster compiler, frame sources, statistics
//! 3. **plotkit-communication** - Device sinks and the flow-controlled dispatcher
//! 4. **plotkit-settings** - Configuration files and validation
//! 5. **plotkit** - Job pipeline and the command-line binary

pub mod job;

pub use plotkit_camtools::{
    CompilerState, FrameSource, ImageFrameSource, RasterJob, RasterParameters, TextFrameSource,
    ToolpathCompiler, ToolpathStats,
};
pub use plotkit_communication::{
    BufferedDeviceSink, CommandDispatcher, DeviceSink, DispatchReport, DispatcherConfig,
    GcodeWriterSink, RecordingSink, SubmitOutcome,
};
pub use plotkit_core::{CommandQueue, DeviceError, DispatchError, Error, Frame, MotionCommand};
pub use plotkit_settings::{Config, DeviceSettings, DispatchSettings};

pub use job::{CompiledJob, Job};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, so G-code written to stdout stays clean
/// - RUST_LOG environment variable support
/// - `info` as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
