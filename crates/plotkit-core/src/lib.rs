//! # PlotKit Core
//!
//! Core types and errors for PlotKit.
//! Provides the data models shared by the toolpath compiler and the
//! command dispatcher, and the layered error types for device I/O.

pub mod data;
pub mod error;

pub use data::{CommandQueue, Frame, MotionCommand};

pub use error::{DeviceError, DispatchError, Error, Result};
