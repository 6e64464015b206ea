//! Slot grid, alpha compositing and the burn loop.
//!
//! - `grid`: equal non-overlapping slots along the bottom of the frame
//! - `blend`: overlay placement with bounds clamping and alpha blending
//! - `burner`: per-frame track queries, compositing, progress and cancel
//! - `pipeline`: file-to-file burn through ffmpeg using `Settings`

mod blend;
mod burner;
mod error;
mod grid;
mod pipeline;

pub use blend::{blend_at, overlay_in_slot, overlay_position};
pub use burner::{BurnOptions, BurnReport, Burner, CancelHandle, ProgressCallback, TrackSummary};
pub use error::BurnError;
pub use grid::{build_grid_layout, GridSpec};
pub use pipeline::{burn_file, BurnJob};
