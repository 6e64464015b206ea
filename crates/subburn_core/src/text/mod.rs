//! Text shaping and rasterization.
//!
//! This module provides:
//! - Script classification used by layout, splitting and timing
//! - Font loading with per-character fallback (`FontBook`)
//! - The two-row ruby renderer (`RubyRenderer`)

mod fonts;
mod layout;
mod raster;
pub mod script;

pub use fonts::{
    BlockFace, FontBook, FontError, GlyphFace, GlyphMetrics, LineMetrics, PlacedGlyph, SizedFont,
    TrueTypeFace,
};
pub use layout::{load_icon, RubyRenderer, TokenPlacement};
