//! Error types for the CAM tools crate.
//!
//! Compilation itself cannot fail; these errors come from loading frames.

use thiserror::Error;

/// Errors that can occur while producing frames for the compiler.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// File could not be loaded.
    #[error("Failed to load file: {0}")]
    LoadError(String),

    /// Image decoding failed.
    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),

    /// Frame text contained something other than pixel characters.
    #[error("Invalid frame at line {line}: unexpected character {found:?}")]
    InvalidFrame { line: usize, found: char },
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CamToolError::InvalidFrame {
            line: 3,
            found: 'x',
        };
        assert_eq!(err.to_string(), "Invalid frame at line 3: unexpected character 'x'");

        let err = CamToolError::LoadError("frames.txt: not found".to_string());
        assert_eq!(err.to_string(), "Failed to load file: frames.txt: not found");
    }
}
