//! # PlotKit Communication
//!
//! Delivers compiled motion commands to the positioning device.
//! Commands go out strictly one at a time, in order, with a fixed backoff
//! whenever the device reports that its buffer is full.

pub mod communication;

pub use communication::{
    BufferedDeviceSink, CommandDispatcher, DeviceSink, DispatchReport, DispatchState,
    DispatcherConfig, GcodeWriterSink, RecordingSink, SubmitOutcome,
};
