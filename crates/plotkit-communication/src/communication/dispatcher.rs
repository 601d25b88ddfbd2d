//! Flow-controlled command dispatch
//!
//! Streams an ordered command queue to a [`DeviceSink`] one command at a
//! time. When the sink reports a full buffer the dispatcher backs off for a
//! fixed delay and offers the same command again; commands are never
//! dropped, duplicated, or reordered.
//!
//! # States
//! - `Sending`: offer the current command to the sink
//! - `Backoff`: wait out the delay, then return to `Sending`
//!
//! The run ends when the queue is empty, or with a [`DispatchError`] when the
//! sink fails for any reason other than capacity.

use crate::communication::sink::{DeviceSink, SubmitOutcome};
use plotkit_core::{DispatchError, MotionCommand};
use std::time::Duration;

/// Dispatcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Offering the current command to the sink
    Sending,
    /// Waiting before retrying the current command
    Backoff,
}

/// Configuration for dispatch
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Delay before retrying a command the sink had no room for
    pub backoff: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            backoff: Duration::from_secs(1),
        }
    }
}

/// Outcome of a completed dispatch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Commands accepted by the sink
    pub accepted: usize,
    /// Times the sink reported a full buffer
    pub backoffs: usize,
}

/// Streams commands to a sink under flow control
pub struct CommandDispatcher<S: DeviceSink> {
    sink: S,
    config: DispatcherConfig,
    state: DispatchState,
}

impl<S: DeviceSink> CommandDispatcher<S> {
    /// Create a dispatcher that owns the sink
    pub fn new(sink: S, config: DispatcherConfig) -> Self {
        Self {
            sink,
            config,
            state: DispatchState::Sending,
        }
    }

    /// Current state
    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Get a reference to the sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Release the sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Deliver every command in `queue`, front to back.
    ///
    /// Returns once the queue is drained. A sink failure other than a full
    /// buffer aborts the run; commands before the failing one have been
    /// delivered, the rest have not.
    pub async fn dispatch<I>(&mut self, queue: I) -> Result<DispatchReport, DispatchError>
    where
        I: IntoIterator<Item = MotionCommand>,
    {
        let mut pending = queue.into_iter();
        let mut report = DispatchReport::default();
        let mut current = pending.next();
        self.state = DispatchState::Sending;

        tracing::info!(
            commands = pending.size_hint().0 + usize::from(current.is_some()),
            "Executing commands"
        );

        while let Some(command) = current {
            match self.state {
                DispatchState::Sending => {
                    let index = report.accepted;
                    let outcome = self.sink.submit(&command).map_err(|source| {
                        tracing::error!(index, "Failed to submit command: {}", source);
                        DispatchError::Sink { index, source }
                    })?;

                    match outcome {
                        SubmitOutcome::Accepted => {
                            tracing::debug!(
                                index,
                                x = command.x,
                                y = command.y,
                                z = command.z,
                                b = command.b,
                                a = command.a,
                                feed_rate = command.feed_rate,
                                "Command accepted"
                            );
                            report.accepted += 1;
                            current = pending.next();
                        }
                        SubmitOutcome::CapacityExceeded => {
                            tracing::warn!(
                                index,
                                backoff_ms = self.config.backoff.as_millis() as u64,
                                "Device buffer full, backing off"
                            );
                            report.backoffs += 1;
                            self.state = DispatchState::Backoff;
                        }
                    }
                }
                DispatchState::Backoff => {
                    tokio::time::sleep(self.config.backoff).await;
                    self.state = DispatchState::Sending;
                }
            }
        }

        tracing::info!(
            accepted = report.accepted,
            backoffs = report.backoffs,
            "Dispatch complete"
        );
        Ok(report)
    }
}
