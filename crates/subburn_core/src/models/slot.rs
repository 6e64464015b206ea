//! Screen slots and track assignments.

use serde::{Deserialize, Serialize};

use super::segment::Segment;
use super::style::TextStyle;

/// Horizontal alignment of a bitmap inside its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl HAlign {
    /// Parse `left`/`center`/`right` (case-insensitive). Anything else centers.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "left" => HAlign::Left,
            "right" => HAlign::Right,
            _ => HAlign::Center,
        }
    }
}

/// A pixel rectangle on the output frame that holds one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub align: HAlign,
}

impl Slot {
    pub fn new(id: u32, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            align: HAlign::Center,
        }
    }

    /// Builder: set the alignment.
    pub fn align(mut self, align: HAlign) -> Self {
        self.align = align;
        self
    }

    /// True if the two rectangles share any pixel.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Ordered collection of slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotLayout {
    slots: Vec<Slot>,
}

impl SlotLayout {
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Look up a slot by id.
    pub fn get(&self, id: u32) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Builder: change the alignment of one slot.
    pub fn with_alignment(mut self, id: u32, align: HAlign) -> Self {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) {
            slot.align = align;
        }
        self
    }
}

/// Binds one segment source and style to one slot.
///
/// At most one assignment per slot id is expected; two assignments naming
/// the same slot are both drawn, in assignment order.
#[derive(Debug, Clone)]
pub struct SlotAssignment {
    /// Target slot id.
    pub slot_id: u32,
    /// Human-readable label (usually the language).
    pub label: String,
    /// Track style.
    pub style: TextStyle,
    /// Timed segments for this slot.
    pub segments: Vec<Segment>,
}

impl SlotAssignment {
    pub fn new(slot_id: u32, label: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            slot_id,
            label: label.into(),
            style: TextStyle::default(),
            segments,
        }
    }

    /// Builder: set the style.
    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_parsing() {
        assert_eq!(HAlign::parse("LEFT"), HAlign::Left);
        assert_eq!(HAlign::parse("right"), HAlign::Right);
        assert_eq!(HAlign::parse("middle"), HAlign::Center);
    }

    #[test]
    fn overlap_detection() {
        let a = Slot::new(1, 0, 0, 10, 10);
        let b = Slot::new(2, 10, 0, 10, 10);
        let c = Slot::new(3, 5, 5, 10, 10);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn layout_lookup_and_alignment() {
        let layout = SlotLayout::new(vec![Slot::new(1, 0, 0, 10, 10), Slot::new(2, 20, 0, 10, 10)])
            .with_alignment(2, HAlign::Right);
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.get(2).map(|s| s.align), Some(HAlign::Right));
        assert!(layout.get(9).is_none());
    }
}
