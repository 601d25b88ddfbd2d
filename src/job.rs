//! Job pipeline
//!
//! Ties the stages together in strict order: load frames, compile them into
//! one command queue, then dispatch the queue to a device sink. Every job gets
//! an id that tags its log output.

use anyhow::{Context, Result};
use plotkit_camtools::{
    FrameSource, ImageFrameSource, TextFrameSource, ToolpathCompiler, ToolpathStats,
};
use plotkit_communication::{CommandDispatcher, DeviceSink, DispatchReport};
use plotkit_core::{CommandQueue, Frame};
use plotkit_settings::Config;
use std::path::PathBuf;
use tracing::Instrument;
use uuid::Uuid;

/// A compiled job ready to dispatch
#[derive(Debug, Clone)]
pub struct CompiledJob {
    /// Frames compiled
    pub frames: usize,
    /// Ordered commands for the whole job
    pub commands: CommandQueue,
    /// Summary of the commands
    pub stats: ToolpathStats,
}

/// One run of the pipeline
#[derive(Debug, Clone)]
pub struct Job {
    id: Uuid,
    config: Config,
}

impl Job {
    /// Create a job with a fresh id
    pub fn new(config: Config) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
        }
    }

    /// Job id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Configuration the job runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load frames from a text frame file or a list of images.
    ///
    /// A single `.txt` input is read as a text frame file; anything else is
    /// read as one image per frame.
    pub fn load_frames(inputs: &[PathBuf], threshold: u8, invert: bool) -> Result<Vec<Frame>> {
        let is_text = matches!(
            inputs,
            [single] if single.extension().is_some_and(|ext| ext == "txt")
        );

        let frames = if is_text {
            TextFrameSource::new(inputs[0].clone()).frames()
        } else {
            ImageFrameSource::new(inputs.to_vec())
                .with_threshold(threshold)
                .with_invert(invert)
                .frames()
        };

        frames.context("Failed to load frames")
    }

    /// Compile frames into a single queue
    pub fn compile(&self, frames: &[Frame]) -> CompiledJob {
        let span = tracing::info_span!("compile", job = %self.id);
        let _guard = span.enter();

        let compiler = ToolpathCompiler::new(self.config.raster);
        let total = frames.len();
        let (commands, state) =
            compiler.compile_frames_with_progress(frames, compiler.initial_state(), |done| {
                tracing::debug!("Compiled frame {}/{}", done, total);
            });

        let stats = ToolpathStats::from_job(frames, &commands);
        tracing::info!(
            frames = total,
            commands = stats.commands,
            plunges = stats.plunges,
            active_pixels = stats.active_pixels,
            final_height = state.height_offset,
            final_rotation = state.rotation_primary,
            "Compilation finished"
        );

        CompiledJob {
            frames: total,
            commands,
            stats,
        }
    }

    /// Stream a compiled job to a sink; returns the sink once the queue is drained
    pub async fn dispatch<S: DeviceSink>(
        &self,
        job: CompiledJob,
        sink: S,
    ) -> Result<(DispatchReport, S)> {
        let span = tracing::info_span!("dispatch", job = %self.id);
        let mut dispatcher = CommandDispatcher::new(sink, self.config.dispatch.dispatcher_config());

        let report = dispatcher
            .dispatch(job.commands)
            .instrument(span)
            .await
            .context("Dispatch aborted")?;

        Ok((report, dispatcher.into_sink()))
    }
}
