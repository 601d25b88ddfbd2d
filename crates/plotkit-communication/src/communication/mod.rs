//! Command delivery
//!
//! - [`sink`]: the device-facing submit interface and the bundled sinks
//! - [`dispatcher`]: the flow-controlled loop that drains a command queue into a sink

pub mod dispatcher;
pub mod sink;

pub use dispatcher::{CommandDispatcher, DispatchReport, DispatchState, DispatcherConfig};
pub use sink::{BufferedDeviceSink, DeviceSink, GcodeWriterSink, RecordingSink, SubmitOutcome};
