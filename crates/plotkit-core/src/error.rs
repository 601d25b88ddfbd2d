//! Error handling for PlotKit
//!
//! Provides error types for the layers that can actually fail:
//! - Device errors (a sink refusing or losing a command for a reason other than capacity)
//! - Dispatch errors (a fatal device error tagged with the queue position)
//!
//! Compilation is total and has no error type. A full device buffer is not an
//! error either; it is reported through `SubmitOutcome::CapacityExceeded`.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Device error type
///
/// Any failure a device sink reports besides a full buffer. These are fatal
/// to a dispatch run.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Connection to the device was lost
    #[error("Connection lost: {reason}")]
    ConnectionLost {
        /// The reason the connection was lost.
        reason: String,
    },

    /// Command was rejected by the device
    #[error("Command rejected: {reason}")]
    Rejected {
        /// The reason the command was rejected.
        reason: String,
    },

    /// Standard I/O error while writing to the device
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic device error
    #[error("Device error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

impl DeviceError {
    /// Create a generic device error from a message
    pub fn other(msg: impl Into<String>) -> Self {
        DeviceError::Other {
            message: msg.into(),
        }
    }
}

/// Dispatch error type
///
/// Raised when a dispatch run is aborted. Commands before `index` were
/// accepted by the device; the command at `index` and everything after it
/// were not.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The sink failed fatally while submitting a command
    #[error("Dispatch aborted at command {index}: {source}")]
    Sink {
        /// Zero-based position of the failing command in the queue.
        index: usize,
        /// The underlying device failure.
        #[source]
        source: DeviceError,
    },
}

impl DispatchError {
    /// Position of the command that could not be delivered
    pub fn index(&self) -> usize {
        match self {
            DispatchError::Sink { index, .. } => *index,
        }
    }
}

/// Main error type for PlotKit
///
/// A unified error type that can represent any error from the lower layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Device error
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Dispatch error
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a dispatch error
    pub fn is_dispatch_error(&self) -> bool {
        matches!(self, Error::Dispatch(_))
    }

    /// Check if this is a device error
    pub fn is_device_error(&self) -> bool {
        matches!(self, Error::Device(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_display() {
        let err = DeviceError::Rejected {
            reason: "axis fault".to_string(),
        };
        assert_eq!(err.to_string(), "Command rejected: axis fault");

        let err = DeviceError::other("unplugged");
        assert_eq!(err.to_string(), "Device error: unplugged");
    }

    #[test]
    fn test_dispatch_error_carries_index() {
        let err = DispatchError::Sink {
            index: 7,
            source: DeviceError::ConnectionLost {
                reason: "cable".to_string(),
            },
        };
        assert_eq!(err.index(), 7);
        assert_eq!(
            err.to_string(),
            "Dispatch aborted at command 7: Connection lost: cable"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = DeviceError::other("x").into();
        assert!(err.is_device_error());

        let err: Error = DispatchError::Sink {
            index: 0,
            source: DeviceError::other("x"),
        }
        .into();
        assert!(err.is_dispatch_error());

        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
