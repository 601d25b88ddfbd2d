//! # PlotKit CAM Tools
//!
//! Turns binary raster frames into motion commands for the positioning device.
//!
//! - **Raster Compiler**: stateful frame-to-toolpath compilation with layered contact height
//! - **Frame Sources**: text frame files and thresholded bitmap images
//! - **Statistics**: summaries of compiled command queues

pub mod error;
pub mod frame_source;
pub mod raster_compiler;
pub mod stats;

pub use error::{CamToolError, CamToolResult};
pub use frame_source::{FrameSource, ImageFrameSource, TextFrameSource};
pub use raster_compiler::{CompilerState, RasterJob, RasterParameters, ToolpathCompiler};
pub use stats::ToolpathStats;
