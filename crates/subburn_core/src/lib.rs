//! Subburn Core - ruby subtitle layout and burn-in
//!
//! This crate contains the layout engine, segment splitting, multi-slot
//! compositing and the ffmpeg frame pipeline with zero UI dependencies.
//! It can be driven by a GUI front end or a CLI tool.

pub mod annotate;
pub mod compose;
pub mod config;
pub mod logging;
pub mod models;
pub mod records;
pub mod split;
pub mod text;
pub mod track;
pub mod video;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
