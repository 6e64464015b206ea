//! Two-row ruby layout: measuring and rendering token sequences.
//!
//! Each token occupies one column. The main text sits in the lower row and
//! its annotation, if any, in the row above. When a word mixes kana with
//! kanji, the annotation is centered over the kanji core only, so okurigana
//! such as the べた in 食べた stay unannotated.

use std::path::Path;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::fonts::{FontBook, SizedFont};
use super::raster::{draw_outlined, paste_over};
use super::script::{has_kanji, split_kana_affixes};
use crate::models::{TextStyle, Token};

/// Measured column of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Column {
    main_w: u32,
    main_h: u32,
    ruby_w: u32,
    ruby_h: u32,
    prefix_w: u32,
    core_w: u32,
    width: u32,
}

/// Measured columns plus row sizes.
#[derive(Debug, Clone, Default)]
struct RowLayout {
    columns: Vec<Column>,
    text_width: u32,
    main_height: u32,
    max_ruby_h: u32,
    ruby_row: u32,
}

/// Where one token lands inside a rendered bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPlacement {
    pub column_x: i32,
    pub column_width: u32,
    pub main_x: i32,
    pub main_y: i32,
    pub main_width: u32,
    /// Left edge and width of the span the annotation is centered over.
    pub core_x: i32,
    pub core_width: u32,
    /// Annotation position, if the token has one.
    pub ruby_x: Option<i32>,
    pub ruby_y: i32,
    pub ruby_width: u32,
}

/// Load an icon image from disk, logging and returning None on failure.
pub fn load_icon(path: &Path) -> Option<RgbaImage> {
    match image::open(path) {
        Ok(img) => Some(img.to_rgba8()),
        Err(e) => {
            tracing::warn!(
                "[Layout] Icon '{}' unavailable, using text fallback: {}",
                path.display(),
                e
            );
            None
        }
    }
}

/// Measures and rasterizes token sequences for one style.
#[derive(Clone)]
pub struct RubyRenderer {
    style: TextStyle,
    main: SizedFont,
    ruby: SizedFont,
    icon: Option<Arc<RgbaImage>>,
}

impl RubyRenderer {
    pub fn new(style: TextStyle, fonts: Arc<FontBook>) -> Self {
        let main = fonts.sized(style.main_font_size);
        let ruby = fonts.sized(style.ruby_font_size);
        Self {
            style,
            main,
            ruby,
            icon: None,
        }
    }

    /// Builder: use `icon` for icon tokens, resampled to the icon size.
    pub fn with_icon(mut self, icon: Option<&RgbaImage>) -> Self {
        let size = self.style.icon_size();
        self.icon = icon.map(|img| {
            Arc::new(imageops::resize(img, size, size, FilterType::Lanczos3))
        });
        self
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn has_icon(&self) -> bool {
        self.icon.is_some()
    }

    fn measure_column(&self, token: &Token) -> Column {
        if token.is_icon() {
            let size = self.style.icon_size();
            return Column {
                main_w: size,
                main_h: size,
                width: size,
                ..Column::default()
            };
        }

        let text = token.text();
        let (main_w, main_h) = self.main.measure(text);
        let (ruby_w, ruby_h) = token
            .ruby_text()
            .map(|r| self.ruby.measure(r))
            .unwrap_or((0, 0));

        let mut column = Column {
            main_w,
            main_h,
            ruby_w,
            ruby_h,
            width: main_w,
            ..Column::default()
        };

        if token.has_ruby() {
            let mut suffix_w = 0;
            if has_kanji(text) {
                let (prefix, core, suffix) = split_kana_affixes(text);
                column.prefix_w = self.main.measure(prefix).0;
                column.core_w = self.main.measure(core).0;
                suffix_w = self.main.measure(suffix).0;
            }
            let span = if column.core_w > 0 {
                column.prefix_w + ruby_w.max(column.core_w) + suffix_w
            } else {
                ruby_w
            };
            column.width = main_w.max(span);
        }

        column
    }

    fn build_layout(&self, tokens: &[Token]) -> RowLayout {
        let columns: Vec<Column> = tokens.iter().map(|t| self.measure_column(t)).collect();
        let text_width = columns.iter().map(|c| c.width).sum();
        let main_height = columns.iter().map(|c| c.main_h).max().unwrap_or(0);
        let max_ruby_h = columns.iter().map(|c| c.ruby_h).max().unwrap_or(0);
        let ruby_row = if max_ruby_h > 0 {
            max_ruby_h + self.style.ruby_gap()
        } else {
            0
        };

        RowLayout {
            columns,
            text_width,
            main_height,
            max_ruby_h,
            ruby_row,
        }
    }

    /// Size of the token run including the outline reach on each side.
    ///
    /// Empty input measures `(0, 0)`.
    pub fn measure(&self, tokens: &[Token]) -> (u32, u32) {
        if tokens.is_empty() {
            return (0, 0);
        }
        let layout = self.build_layout(tokens);
        let stroke = self.style.stroke_width * 2;
        (
            layout.text_width + stroke,
            layout.main_height + layout.ruby_row + stroke,
        )
    }

    /// Token positions inside the bitmap `render` would produce.
    pub fn placements(&self, tokens: &[Token]) -> Vec<TokenPlacement> {
        let layout = self.build_layout(tokens);
        self.place(tokens, &layout)
    }

    fn place(&self, tokens: &[Token], layout: &RowLayout) -> Vec<TokenPlacement> {
        let pad = self.style.effective_padding() as i32;
        let mut cursor = pad;

        tokens
            .iter()
            .zip(&layout.columns)
            .map(|(token, col)| {
                let main_x = cursor + (col.width as i32 - col.main_w as i32) / 2;
                let main_y = pad + layout.ruby_row as i32;

                let (core_x, core_width) = if col.core_w > 0 {
                    (main_x + col.prefix_w as i32, col.core_w)
                } else {
                    (cursor, col.width)
                };

                let ruby_x = token.ruby_text().map(|_| {
                    if col.core_w > 0 {
                        (core_x as f32 + (col.core_w as f32 - col.ruby_w as f32) / 2.0) as i32
                    } else {
                        cursor + (col.width as i32 - col.ruby_w as i32) / 2
                    }
                });

                let placement = TokenPlacement {
                    column_x: cursor,
                    column_width: col.width,
                    main_x,
                    main_y,
                    main_width: col.main_w,
                    core_x,
                    core_width,
                    ruby_x,
                    ruby_y: pad + (layout.max_ruby_h as i32 - col.ruby_h as i32),
                    ruby_width: col.ruby_w,
                };
                cursor += col.width as i32;
                placement
            })
            .collect()
    }

    /// Rasterize the token run onto a transparent bitmap.
    ///
    /// Empty input yields a 1x1 transparent bitmap.
    pub fn render(&self, tokens: &[Token]) -> RgbaImage {
        if tokens.is_empty() {
            return RgbaImage::new(1, 1);
        }

        let pad = self.style.effective_padding();
        let layout = self.build_layout(tokens);
        let width = (layout.text_width + pad * 2).max(1);
        let height = (layout.main_height + layout.ruby_row + pad * 2).max(1);
        let mut canvas = RgbaImage::new(width, height);

        let placements = self.place(tokens, &layout);
        for ((token, col), at) in tokens.iter().zip(&layout.columns).zip(&placements) {
            if token.is_icon() {
                let icon_y = at.main_y + (layout.main_height as i32 - col.main_h as i32).max(0) / 2;
                match &self.icon {
                    Some(icon) => paste_over(&mut canvas, icon, at.main_x, icon_y),
                    None => {
                        let glyphs = self.main.layout(token.text(), at.main_x, icon_y);
                        draw_outlined(
                            &mut canvas,
                            &glyphs,
                            self.style.text_color,
                            self.style.stroke_color,
                            self.style.stroke_width,
                        );
                    }
                }
                continue;
            }

            let color = token.color_override().unwrap_or(self.style.text_color);

            let glyphs = self.main.layout(token.text(), at.main_x, at.main_y);
            draw_outlined(
                &mut canvas,
                &glyphs,
                color,
                self.style.stroke_color,
                self.style.stroke_width,
            );

            if let (Some(ruby), Some(ruby_x)) = (token.ruby_text(), at.ruby_x) {
                let glyphs = self.ruby.layout(ruby, ruby_x, at.ruby_y);
                draw_outlined(
                    &mut canvas,
                    &glyphs,
                    color,
                    self.style.stroke_color,
                    self.style.stroke_width,
                );
            }
        }

        canvas
    }
}
