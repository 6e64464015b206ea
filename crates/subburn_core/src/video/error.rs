//! Frame I/O error types.

use std::path::PathBuf;

/// Errors that can occur while reading or writing frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Failed to open the input or output.
    #[error("Failed to open '{path}': {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// An external tool could not be started.
    #[error("{0} not found or not executable")]
    ToolNotFound(String),

    /// Failed to read a frame.
    #[error("Failed to read frame {index}: {message}")]
    ReadFailed { index: u64, message: String },

    /// Failed to write a frame.
    #[error("Failed to write frame {index}: {message}")]
    WriteFailed { index: u64, message: String },

    /// Frame does not match the stream dimensions.
    #[error("Frame size {actual_w}x{actual_h} does not match stream size {expected_w}x{expected_h}")]
    SizeMismatch {
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },

    /// Stream properties could not be detected.
    #[error("Failed to detect video properties: {0}")]
    ProbeFailed(String),

    /// An external tool exited with an error.
    #[error("{tool} exited with {status}")]
    ProcessFailed { tool: String, status: String },
}

impl FrameError {
    /// Create an open error.
    pub fn open(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a read error.
    pub fn read(index: u64, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            index,
            message: message.into(),
        }
    }

    /// Create a write error.
    pub fn write(index: u64, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            index,
            message: message.into(),
        }
    }

    /// Create a size mismatch error.
    pub fn size_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::SizeMismatch {
            expected_w: expected.0,
            expected_h: expected.1,
            actual_w: actual.0,
            actual_h: actual.1,
        }
    }
}
