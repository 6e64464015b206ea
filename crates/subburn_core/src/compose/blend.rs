//! Overlay placement and alpha blending onto RGB frames.

use image::{RgbImage, RgbaImage};

use crate::models::{HAlign, Slot};

/// Top-left corner for an overlay of `size` in `slot` on a frame of `frame`.
///
/// The overlay is aligned horizontally per the slot, centered vertically,
/// and clamped so it lies entirely inside the frame. Returns None when the
/// overlay is larger than the frame in either dimension.
pub fn overlay_position(slot: &Slot, size: (u32, u32), frame: (u32, u32)) -> Option<(u32, u32)> {
    let (w, h) = size;
    let (frame_w, frame_h) = frame;
    if w > frame_w || h > frame_h {
        return None;
    }

    let x = match slot.align {
        HAlign::Left => slot.x,
        HAlign::Center => slot.x + slot.width.saturating_sub(w) / 2,
        HAlign::Right => slot.x + slot.width.saturating_sub(w),
    };
    let y = slot.y + slot.height.saturating_sub(h) / 2;

    Some((x.min(frame_w - w), y.min(frame_h - h)))
}

/// Blend `overlay` onto `frame` at `(x, y)` using the overlay's alpha.
///
/// Per channel: `out = bg * (1 - a) + fg * a`. The overlay must lie inside
/// the frame; pixels outside are ignored.
pub fn blend_at(frame: &mut RgbImage, overlay: &RgbaImage, x: u32, y: u32) {
    let (frame_w, frame_h) = frame.dimensions();

    for (ox, oy, px) in overlay.enumerate_pixels() {
        let alpha = px.0[3];
        if alpha == 0 {
            continue;
        }
        let (fx, fy) = (x + ox, y + oy);
        if fx >= frame_w || fy >= frame_h {
            continue;
        }

        let bg = frame.get_pixel_mut(fx, fy);
        if alpha == 255 {
            bg.0 = [px.0[0], px.0[1], px.0[2]];
            continue;
        }

        let a = alpha as f32 / 255.0;
        for c in 0..3 {
            let v = bg.0[c] as f32 * (1.0 - a) + px.0[c] as f32 * a;
            bg.0[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Place and blend an overlay for `slot`. Returns false if it was skipped.
pub fn overlay_in_slot(frame: &mut RgbImage, overlay: &RgbaImage, slot: &Slot) -> bool {
    match overlay_position(slot, overlay.dimensions(), frame.dimensions()) {
        Some((x, y)) => {
            blend_at(frame, overlay, x, y);
            true
        }
        None => {
            tracing::debug!(
                "[Compose] Overlay {}x{} larger than frame, skipped for slot {}",
                overlay.width(),
                overlay.height(),
                slot.id
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    #[test]
    fn alignment_positions() {
        let slot = Slot::new(1, 100, 50, 200, 40);
        assert_eq!(overlay_position(&slot, (50, 20), (1000, 1000)), Some((175, 60)));
        assert_eq!(
            overlay_position(&slot.align(HAlign::Left), (50, 20), (1000, 1000)),
            Some((100, 60))
        );
        assert_eq!(
            overlay_position(&slot.align(HAlign::Right), (50, 20), (1000, 1000)),
            Some((250, 60))
        );
    }

    #[test]
    fn wider_than_slot_starts_at_slot_edge() {
        let slot = Slot::new(1, 100, 50, 200, 40);
        assert_eq!(overlay_position(&slot, (300, 60), (1000, 1000)), Some((100, 50)));
    }

    #[test]
    fn clamped_inside_frame() {
        let slot = Slot::new(1, 900, 950, 200, 100);
        let (x, y) = overlay_position(&slot, (150, 80), (1000, 1000)).unwrap();
        assert!(x + 150 <= 1000);
        assert!(y + 80 <= 1000);
    }

    #[test]
    fn larger_than_frame_is_skipped() {
        let slot = Slot::new(1, 0, 0, 10, 10);
        assert_eq!(overlay_position(&slot, (11, 5), (10, 10)), None);
        assert_eq!(overlay_position(&slot, (10, 10), (10, 10)), Some((0, 0)));
    }

    #[test]
    fn blend_formula() {
        let mut frame = RgbImage::from_pixel(2, 1, Rgb([100, 100, 100]));
        let mut overlay = RgbaImage::new(2, 1);
        overlay.put_pixel(0, 0, Rgba([200, 0, 50, 255]));
        overlay.put_pixel(1, 0, Rgba([200, 0, 100, 51]));

        blend_at(&mut frame, &overlay, 0, 0);

        assert_eq!(frame.get_pixel(0, 0).0, [200, 0, 50]);
        // a = 0.2: 100 * 0.8 + 200 * 0.2 = 120, 100 * 0.8 + 0 = 80, 100
        assert_eq!(frame.get_pixel(1, 0).0, [120, 80, 100]);
    }

    #[test]
    fn transparent_overlay_leaves_frame() {
        let mut frame = RgbImage::from_pixel(3, 3, Rgb([7, 8, 9]));
        let overlay = RgbaImage::new(3, 3);
        assert!(overlay_in_slot(&mut frame, &overlay, &Slot::new(1, 0, 0, 3, 3)));
        assert!(frame.pixels().all(|p| p.0 == [7, 8, 9]));
    }
}
