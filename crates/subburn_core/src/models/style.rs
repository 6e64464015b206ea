//! Per-track text style.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// Visual style of one track.
///
/// Immutable per track once the track is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Main text size in pixels.
    #[serde(default = "default_main_font_size")]
    pub main_font_size: u32,

    /// Annotation text size in pixels.
    #[serde(default = "default_ruby_font_size")]
    pub ruby_font_size: u32,

    /// Fill color for tokens without a color override.
    #[serde(default = "default_text_color")]
    pub text_color: Color,

    /// Outline color.
    #[serde(default = "default_stroke_color")]
    pub stroke_color: Color,

    /// Outline radius in pixels (0 disables the outline).
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,

    /// Line spacing ratio.
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,

    /// Gap between annotation row and main row, as a ratio of the annotation size.
    #[serde(default = "default_ruby_spacing")]
    pub ruby_spacing: f32,

    /// Transparent margin around rendered bitmaps.
    #[serde(default = "default_padding")]
    pub padding: u32,
}

fn default_main_font_size() -> u32 {
    48
}

fn default_ruby_font_size() -> u32 {
    24
}

fn default_text_color() -> Color {
    Color::WHITE
}

fn default_stroke_color() -> Color {
    Color::BLACK
}

fn default_stroke_width() -> u32 {
    2
}

fn default_line_spacing() -> f32 {
    1.2
}

fn default_ruby_spacing() -> f32 {
    0.3
}

fn default_padding() -> u32 {
    16
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            main_font_size: default_main_font_size(),
            ruby_font_size: default_ruby_font_size(),
            text_color: default_text_color(),
            stroke_color: default_stroke_color(),
            stroke_width: default_stroke_width(),
            line_spacing: default_line_spacing(),
            ruby_spacing: default_ruby_spacing(),
            padding: default_padding(),
        }
    }
}

impl TextStyle {
    /// Builder: set both font sizes.
    pub fn with_sizes(mut self, main: u32, ruby: u32) -> Self {
        self.main_font_size = main.max(1);
        self.ruby_font_size = ruby.max(1);
        self
    }

    /// Builder: set the outline width.
    pub fn with_stroke(mut self, width: u32) -> Self {
        self.stroke_width = width;
        self
    }

    /// Builder: set the bitmap padding.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Padding actually applied around a rendered bitmap.
    ///
    /// Never less than the outline reach on both sides.
    pub fn effective_padding(&self) -> u32 {
        self.padding.max(self.stroke_width * 2)
    }

    /// Side length of an icon glyph.
    pub fn icon_size(&self) -> u32 {
        ((self.main_font_size as f32 * 0.9) as u32).max(1)
    }

    /// Vertical gap between the annotation row and the main row.
    pub fn ruby_gap(&self) -> u32 {
        (self.ruby_font_size as f32 * self.ruby_spacing).max(0.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let style = TextStyle::default();
        assert_eq!(style.main_font_size, 48);
        assert_eq!(style.ruby_font_size, 24);
        assert_eq!(style.stroke_width, 2);
        assert_eq!(style.ruby_gap(), 7);
        assert_eq!(style.icon_size(), 43);
        assert_eq!(style.effective_padding(), 16);
    }

    #[test]
    fn padding_grows_with_stroke() {
        let style = TextStyle::default().with_stroke(12);
        assert_eq!(style.effective_padding(), 24);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let style: TextStyle = toml::from_str("main_font_size = 60").unwrap();
        assert_eq!(style.main_font_size, 60);
        assert_eq!(style.ruby_font_size, 24);
        assert_eq!(style.text_color, Color::WHITE);
    }
}
