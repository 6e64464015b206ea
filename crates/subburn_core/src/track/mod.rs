//! Per-slot track scanning and render caching.
//!
//! A `Track` answers "which segment is showing at time t" with a cursor
//! that only moves forward, so a full pass over a video is linear in the
//! number of segments. Rendered bitmaps are memoized by segment identity
//! and downscaled once to fit the slot.

use std::collections::HashMap;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::models::{Segment, SegmentId, Slot};
use crate::text::RubyRenderer;

/// One slot's segments plus scan state and render cache.
pub struct Track {
    label: String,
    slot: Slot,
    renderer: RubyRenderer,
    segments: Vec<Segment>,
    cursor: usize,
    cache: HashMap<SegmentId, Arc<RgbaImage>>,
}

impl Track {
    /// Build a track. Segments are sorted by start time.
    pub fn new(
        label: impl Into<String>,
        slot: Slot,
        renderer: RubyRenderer,
        mut segments: Vec<Segment>,
    ) -> Self {
        segments.sort_by(|a, b| a.start().total_cmp(&b.start()));
        Self {
            label: label.into(),
            slot,
            renderer,
            segments,
            cursor: 0,
            cache: HashMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of bitmaps rendered so far.
    pub fn cached_renders(&self) -> usize {
        self.cache.len()
    }

    /// Rewind the cursor for a new pass. The render cache is kept.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Segment showing at `t`, if any.
    ///
    /// Query times must be non-decreasing between calls (or `reset` must be
    /// called first); an earlier `t` never moves the cursor back.
    pub fn active_segment(&mut self, t: f64) -> Option<&Segment> {
        while self.cursor < self.segments.len() && self.segments[self.cursor].end() < t {
            self.cursor += 1;
        }
        self.segments
            .get(self.cursor)
            .filter(|seg| seg.start() <= t && t <= seg.end())
    }

    /// Bitmap for `segment`, rendered and fitted to the slot on first use.
    pub fn render_segment(&mut self, segment: &Segment) -> Arc<RgbaImage> {
        if let Some(img) = self.cache.get(&segment.id()) {
            return Arc::clone(img);
        }

        let img = fit_to_slot(self.renderer.render(segment.tokens()), &self.slot);
        tracing::trace!(
            "[Track] {} rendered segment {} at {}x{}",
            self.label,
            segment.id(),
            img.width(),
            img.height()
        );

        let img = Arc::new(img);
        self.cache.insert(segment.id(), Arc::clone(&img));
        img
    }

    /// Bitmap to draw at `t`, if a segment is showing.
    pub fn overlay_at(&mut self, t: f64) -> Option<Arc<RgbaImage>> {
        let segment = self.active_segment(t)?.clone();
        Some(self.render_segment(&segment))
    }
}

/// Uniformly downscale `img` so it fits inside the slot. Never upscales.
pub fn fit_to_slot(img: RgbaImage, slot: &Slot) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w <= slot.width && h <= slot.height {
        return img;
    }

    let scale = (slot.width as f64 / w as f64).min(slot.height as f64 / h as f64);
    let new_w = ((w as f64 * scale) as u32).clamp(1, slot.width.max(1));
    let new_h = ((h as f64 * scale) as u32).clamp(1, slot.height.max(1));
    imageops::resize(&img, new_w, new_h, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TextStyle, Token};
    use crate::text::FontBook;

    fn seg(start: f64, end: f64, text: &str) -> Segment {
        Segment::new(start, end, vec![Token::new(text)]).unwrap()
    }

    fn track(segments: Vec<Segment>, slot: Slot) -> Track {
        let renderer = RubyRenderer::new(TextStyle::default(), Arc::new(FontBook::builtin()));
        Track::new("test", slot, renderer, segments)
    }

    #[test]
    fn finds_active_segment_in_order() {
        let mut t = track(
            vec![seg(5.0, 6.0, "B"), seg(1.0, 2.0, "A")],
            Slot::new(1, 0, 0, 800, 200),
        );

        assert!(t.active_segment(0.5).is_none());
        assert_eq!(t.active_segment(1.0).map(|s| s.text()), Some("A"));
        assert_eq!(t.active_segment(2.0).map(|s| s.text()), Some("A"));
        assert!(t.active_segment(3.0).is_none());
        assert_eq!(t.active_segment(5.5).map(|s| s.text()), Some("B"));
        assert!(t.active_segment(7.0).is_none());
    }

    #[test]
    fn cursor_never_moves_back() {
        let mut t = track(
            vec![seg(0.0, 1.0, "A"), seg(2.0, 3.0, "B")],
            Slot::new(1, 0, 0, 800, 200),
        );
        assert_eq!(t.active_segment(2.5).map(|s| s.text()), Some("B"));
        assert!(t.active_segment(0.5).is_none());

        t.reset();
        assert_eq!(t.active_segment(0.5).map(|s| s.text()), Some("A"));
    }

    #[test]
    fn render_is_cached_by_identity() {
        let mut t = track(vec![seg(0.0, 1.0, "A")], Slot::new(1, 0, 0, 800, 200));
        let a = t.overlay_at(0.2).unwrap();
        let b = t.overlay_at(0.8).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(t.cached_renders(), 1);
    }

    #[test]
    fn oversized_render_is_downscaled() {
        let slot = Slot::new(1, 0, 0, 100, 40);
        let mut t = track(vec![seg(0.0, 1.0, "ABCDEFGH")], slot);
        let img = t.overlay_at(0.5).unwrap();
        assert!(img.width() <= 100);
        assert!(img.height() <= 40);

        // aspect ratio is kept
        let full = RubyRenderer::new(TextStyle::default(), Arc::new(FontBook::builtin()))
            .render(&[Token::new("ABCDEFGH")]);
        let ratio = full.width() as f64 / full.height() as f64;
        let scaled = img.width() as f64 / img.height() as f64;
        assert!((ratio - scaled).abs() / ratio < 0.1);
    }

    #[test]
    fn small_render_is_not_upscaled() {
        let img = RgbaImage::new(10, 10);
        let out = fit_to_slot(img, &Slot::new(1, 0, 0, 100, 100));
        assert_eq!(out.dimensions(), (10, 10));
    }
}
