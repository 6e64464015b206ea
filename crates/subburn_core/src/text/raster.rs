//! Pixel-level drawing onto transparent RGBA canvases.

use image::{Rgba, RgbaImage};

use super::fonts::PlacedGlyph;
use crate::models::Color;

/// Source-over composite of a solid color at `coverage` onto one pixel.
fn blend_over(dst: &mut Rgba<u8>, color: Color, coverage: u8) {
    if coverage == 0 {
        return;
    }
    let src_a = coverage as f32 / 255.0;
    let dst_a = dst.0[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }

    let mix = |s: u8, d: u8| -> u8 {
        let v = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };

    dst.0 = [
        mix(color.r, dst.0[0]),
        mix(color.g, dst.0[1]),
        mix(color.b, dst.0[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ];
}

/// Draw glyph coverage in `color`, shifted by `(dx, dy)`. Clipped to the canvas.
pub fn draw_glyphs(canvas: &mut RgbaImage, glyphs: &[PlacedGlyph], color: Color, dx: i32, dy: i32) {
    let (cw, ch) = (canvas.width() as i32, canvas.height() as i32);

    for glyph in glyphs {
        for gy in 0..glyph.height {
            let y = glyph.y + dy + gy as i32;
            if y < 0 || y >= ch {
                continue;
            }
            for gx in 0..glyph.width {
                let x = glyph.x + dx + gx as i32;
                if x < 0 || x >= cw {
                    continue;
                }
                let coverage = glyph.coverage[gy * glyph.width + gx];
                blend_over(canvas.get_pixel_mut(x as u32, y as u32), color, coverage);
            }
        }
    }
}

/// Draw glyphs with an outline: every offset within a disc of radius
/// `stroke_width` in `stroke`, then the fill on top.
pub fn draw_outlined(
    canvas: &mut RgbaImage,
    glyphs: &[PlacedGlyph],
    fill: Color,
    stroke: Color,
    stroke_width: u32,
) {
    let r = stroke_width as i32;
    if r > 0 {
        for dx in -r..=r {
            for dy in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    draw_glyphs(canvas, glyphs, stroke, dx, dy);
                }
            }
        }
    }
    draw_glyphs(canvas, glyphs, fill, 0, 0);
}

/// Source-over composite of an RGBA image at `(x, y)`. Clipped to the canvas.
pub fn paste_over(canvas: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let (cw, ch) = (canvas.width() as i32, canvas.height() as i32);

    for (sx, sy, pixel) in src.enumerate_pixels() {
        let tx = x + sx as i32;
        let ty = y + sy as i32;
        if tx < 0 || ty < 0 || tx >= cw || ty >= ch {
            continue;
        }
        let [r, g, b, a] = pixel.0;
        blend_over(
            canvas.get_pixel_mut(tx as u32, ty as u32),
            Color::from_rgb(r, g, b),
            a,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(x: i32, y: i32) -> PlacedGlyph {
        PlacedGlyph {
            x,
            y,
            width: 1,
            height: 1,
            coverage: vec![255],
        }
    }

    #[test]
    fn opaque_coverage_replaces_transparent_pixel() {
        let mut canvas = RgbaImage::new(3, 3);
        draw_glyphs(&mut canvas, &[dot(1, 1)], Color::from_rgb(10, 20, 30), 0, 0);
        assert_eq!(canvas.get_pixel(1, 1).0, [10, 20, 30, 255]);
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn outline_surrounds_fill() {
        let mut canvas = RgbaImage::new(5, 5);
        draw_outlined(&mut canvas, &[dot(2, 2)], Color::WHITE, Color::BLACK, 1);
        assert_eq!(canvas.get_pixel(2, 2).0, [255, 255, 255, 255]);
        assert_eq!(canvas.get_pixel(1, 2).0, [0, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(2, 3).0, [0, 0, 0, 255]);
        // Diagonal is outside a radius-1 disc
        assert_eq!(canvas.get_pixel(1, 1).0[3], 0);
    }

    #[test]
    fn drawing_is_clipped() {
        let mut canvas = RgbaImage::new(2, 2);
        draw_glyphs(&mut canvas, &[dot(-1, 0), dot(5, 5)], Color::WHITE, 0, 0);
        assert!(canvas.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn half_coverage_blends() {
        let mut canvas = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let glyph = PlacedGlyph {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
            coverage: vec![128],
        };
        draw_glyphs(&mut canvas, &[glyph], Color::WHITE, 0, 0);
        let p = canvas.get_pixel(0, 0).0;
        assert_eq!(p[3], 255);
        assert!((127..=129).contains(&p[0]));
    }
}
