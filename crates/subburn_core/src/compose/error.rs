//! Burn job error types.

use crate::video::FrameError;

/// Structural failures that abort a burn job.
///
/// Per-segment problems (bad records, overflowing text, missing glyphs)
/// never surface here; they are resolved or logged where they occur.
#[derive(Debug, thiserror::Error)]
pub enum BurnError {
    /// The layout has no slots.
    #[error("Layout has no slots")]
    NoSlots,

    /// The source reports no usable frame rate and none was given.
    #[error("No usable frame rate (source reported {0})")]
    InvalidFrameRate(f64),

    /// Frame input or output failed.
    #[error("Frame I/O error: {0}")]
    Frame(#[from] FrameError),
}
