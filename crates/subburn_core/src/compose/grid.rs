//! Grid slot layout along the bottom of the frame.

use serde::{Deserialize, Serialize};

use super::error::BurnError;
use crate::models::{HAlign, Slot, SlotLayout};

/// Parameters of a bottom-band slot grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    #[serde(default = "default_rows")]
    pub rows: u32,

    #[serde(default = "default_cols")]
    pub cols: u32,

    /// Height of the subtitle band as a fraction of the frame height.
    #[serde(default = "default_height_ratio")]
    pub height_ratio: f64,

    /// Left and right margin in pixels.
    #[serde(default = "default_margin")]
    pub margin: u32,

    /// Gap between slots in pixels.
    #[serde(default = "default_gutter")]
    pub gutter: u32,

    /// Raise the band by this many slot heights (plus gutters).
    #[serde(default = "default_lift_slots")]
    pub lift_slots: u32,

    /// Alignment given to every slot.
    #[serde(default)]
    pub align: HAlign,
}

fn default_rows() -> u32 {
    2
}

fn default_cols() -> u32 {
    2
}

fn default_height_ratio() -> f64 {
    0.28
}

fn default_margin() -> u32 {
    24
}

fn default_gutter() -> u32 {
    12
}

fn default_lift_slots() -> u32 {
    1
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            height_ratio: default_height_ratio(),
            margin: default_margin(),
            gutter: default_gutter(),
            lift_slots: default_lift_slots(),
            align: HAlign::Center,
        }
    }
}

impl GridSpec {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Builder: set the lift.
    pub fn lift(mut self, lift_slots: u32) -> Self {
        self.lift_slots = lift_slots;
        self
    }
}

/// Build equal, non-overlapping slots in row-major order with ids from 1.
pub fn build_grid_layout(
    frame_width: u32,
    frame_height: u32,
    spec: &GridSpec,
) -> Result<SlotLayout, BurnError> {
    if spec.rows == 0 || spec.cols == 0 {
        return Err(BurnError::NoSlots);
    }

    let rows = spec.rows as i64;
    let cols = spec.cols as i64;
    let gutter = spec.gutter as i64;
    let margin = spec.margin as i64;

    let band = (frame_height as f64 * spec.height_ratio.max(0.0)) as i64;
    let slot_h = ((band - gutter * (rows - 1)).div_euclid(rows)).max(1);
    let lift = (slot_h + gutter) * spec.lift_slots as i64;
    let top_y = (frame_height as i64 - band - lift).max(0);
    let slot_w = ((frame_width as i64 - gutter * (cols - 1) - margin * 2).div_euclid(cols)).max(1);

    let mut slots = Vec::with_capacity((rows * cols) as usize);
    let mut id = 1;
    for row in 0..rows {
        for col in 0..cols {
            let x = margin + col * (slot_w + gutter);
            let y = top_y + row * (slot_h + gutter);
            slots.push(
                Slot::new(id, x as u32, y as u32, slot_w as u32, slot_h as u32).align(spec.align),
            );
            id += 1;
        }
    }

    tracing::debug!(
        "[Layout] {}x{} grid on {}x{}: slots {}x{} from y={}",
        spec.rows,
        spec.cols,
        frame_width,
        frame_height,
        slot_w,
        slot_h,
        top_y
    );

    Ok(SlotLayout::new(slots))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_hd_two_by_two() {
        let spec = GridSpec::new(2, 2).lift(0);
        let layout = build_grid_layout(1920, 1080, &spec).unwrap();

        assert_eq!(layout.len(), 4);
        let ids: Vec<u32> = layout.slots().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        for slot in layout.slots() {
            assert_eq!((slot.width, slot.height), (930, 145));
        }

        // band = 302, top = 778
        let first = layout.get(1).unwrap();
        assert_eq!((first.x, first.y), (24, 778));
        let second = layout.get(2).unwrap();
        assert_eq!((second.x, second.y), (24 + 930 + 12, 778));
        let third = layout.get(3).unwrap();
        assert_eq!((third.x, third.y), (24, 778 + 145 + 12));
    }

    #[test]
    fn slots_do_not_overlap() {
        let layout = build_grid_layout(1280, 720, &GridSpec::new(3, 3)).unwrap();
        let slots = layout.slots();
        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn lift_raises_band() {
        let flat = build_grid_layout(1920, 1080, &GridSpec::new(2, 2).lift(0)).unwrap();
        let lifted = build_grid_layout(1920, 1080, &GridSpec::new(2, 2).lift(1)).unwrap();
        let dy = flat.get(1).unwrap().y - lifted.get(1).unwrap().y;
        assert_eq!(dy, 145 + 12);
    }

    #[test]
    fn lift_is_clamped_at_top() {
        let layout = build_grid_layout(640, 100, &GridSpec::new(1, 1).lift(50)).unwrap();
        assert_eq!(layout.get(1).unwrap().y, 0);
    }

    #[test]
    fn degenerate_sizes_stay_positive() {
        let layout = build_grid_layout(10, 10, &GridSpec::new(4, 4)).unwrap();
        assert!(layout.slots().iter().all(|s| s.width >= 1 && s.height >= 1));
    }

    #[test]
    fn zero_rows_is_an_error() {
        assert!(matches!(
            build_grid_layout(1920, 1080, &GridSpec::new(0, 2)),
            Err(BurnError::NoSlots)
        ));
    }
}
