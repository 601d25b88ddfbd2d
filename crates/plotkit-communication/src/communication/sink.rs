//! Device sinks
//!
//! A sink is the single place motion commands leave the process. It accepts
//! one command at a time and may report that its buffer is currently full.
//! A full buffer is an expected outcome, not an error; anything else a sink
//! reports is a [`DeviceError`] and ends the dispatch run.

use parking_lot::Mutex;
use plotkit_core::{DeviceError, MotionCommand};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of offering one command to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The command was taken and will be executed
    Accepted,
    /// The device cannot take another command right now; offer it again later
    CapacityExceeded,
}

/// The downstream consumer of motion commands
pub trait DeviceSink {
    /// Offer one command to the device
    fn submit(&mut self, command: &MotionCommand) -> Result<SubmitOutcome, DeviceError>;
}

impl<S: DeviceSink + ?Sized> DeviceSink for Box<S> {
    fn submit(&mut self, command: &MotionCommand) -> Result<SubmitOutcome, DeviceError> {
        (**self).submit(command)
    }
}

/// Sink that records every command it accepts
///
/// Clones share the same record, so a handle kept by the caller observes what
/// the dispatcher delivered.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    accepted: Arc<Mutex<Vec<MotionCommand>>>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of accepted commands, in delivery order
    pub fn accepted(&self) -> Vec<MotionCommand> {
        self.accepted.lock().clone()
    }

    /// Number of accepted commands
    pub fn len(&self) -> usize {
        self.accepted.lock().len()
    }

    /// True if nothing has been accepted yet
    pub fn is_empty(&self) -> bool {
        self.accepted.lock().is_empty()
    }
}

impl DeviceSink for RecordingSink {
    fn submit(&mut self, command: &MotionCommand) -> Result<SubmitOutcome, DeviceError> {
        self.accepted.lock().push(*command);
        Ok(SubmitOutcome::Accepted)
    }
}

/// Simulated device with a bounded command buffer
///
/// The device executes one buffered command per `execution_interval`. When
/// the buffer holds `capacity` commands, submissions report
/// [`SubmitOutcome::CapacityExceeded`] until the device catches up.
#[derive(Debug)]
pub struct BufferedDeviceSink {
    capacity: usize,
    execution_interval: Duration,
    buffer: VecDeque<MotionCommand>,
    last_drain: Instant,
    executed: usize,
}

impl BufferedDeviceSink {
    /// Create a simulated device
    pub fn new(capacity: usize, execution_interval: Duration) -> Self {
        Self {
            capacity,
            execution_interval,
            buffer: VecDeque::with_capacity(capacity),
            last_drain: Instant::now(),
            executed: 0,
        }
    }

    /// Commands currently waiting in the device buffer
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Commands the simulated device has finished executing
    pub fn executed(&self) -> usize {
        self.executed
    }

    /// Buffer usage as a percentage
    pub fn buffer_usage_percent(&self) -> u32 {
        if self.capacity == 0 {
            return 100;
        }
        ((self.buffer.len() as f64 / self.capacity as f64) * 100.0) as u32
    }

    fn drain(&mut self, now: Instant) {
        if self.buffer.is_empty() {
            self.last_drain = now;
            return;
        }

        if self.execution_interval.is_zero() {
            self.executed += self.buffer.len();
            self.buffer.clear();
            self.last_drain = now;
            return;
        }

        let ticks = now.saturating_duration_since(self.last_drain).as_nanos()
            / self.execution_interval.as_nanos();
        let done = ticks.min(self.buffer.len() as u128) as usize;
        self.buffer.drain(..done);
        self.executed += done;

        if self.buffer.is_empty() {
            self.last_drain = now;
        } else {
            self.last_drain += self.execution_interval * done as u32;
        }
    }
}

impl DeviceSink for BufferedDeviceSink {
    fn submit(&mut self, command: &MotionCommand) -> Result<SubmitOutcome, DeviceError> {
        self.drain(Instant::now());

        if self.buffer.len() >= self.capacity {
            return Ok(SubmitOutcome::CapacityExceeded);
        }

        self.buffer.push_back(*command);
        Ok(SubmitOutcome::Accepted)
    }
}

/// Sink that writes each accepted command as a G-code line
///
/// Never reports a full buffer; write failures are fatal device errors.
#[derive(Debug)]
pub struct GcodeWriterSink<W: Write> {
    writer: W,
    header_written: bool,
    lines: usize,
}

impl<W: Write> GcodeWriterSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
            lines: 0,
        }
    }

    /// Number of motion lines written
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Flush and return the underlying writer
    pub fn finish(mut self) -> Result<W, DeviceError> {
        self.write_header()?;
        writeln!(self.writer, "; End of job")?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_header(&mut self) -> Result<(), DeviceError> {
        if self.header_written {
            return Ok(());
        }
        writeln!(self.writer, "; PlotKit raster job")?;
        writeln!(
            self.writer,
            "; Generated: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "G90 ; Absolute positioning")?;
        self.header_written = true;
        Ok(())
    }
}

impl<W: Write> DeviceSink for GcodeWriterSink<W> {
    fn submit(&mut self, command: &MotionCommand) -> Result<SubmitOutcome, DeviceError> {
        self.write_header()?;
        writeln!(self.writer, "{}", command.to_gcode())?;
        self.lines += 1;
        Ok(SubmitOutcome::Accepted)
    }
}
