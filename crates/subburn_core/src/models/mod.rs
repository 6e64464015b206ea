//! Shared data types for tokens, segments, styles and slots.
//!
//! These are pure data types with no rendering logic. The layout engine,
//! splitter, scanner and compositor all build on top of them.

mod color;
mod segment;
mod slot;
mod style;
mod token;

pub use color::{Color, Palette, WordClass};
pub use segment::{Segment, SegmentId};
pub use slot::{HAlign, Slot, SlotAssignment, SlotLayout};
pub use style::TextStyle;
pub use token::{IconKind, Token, TokenKind};
