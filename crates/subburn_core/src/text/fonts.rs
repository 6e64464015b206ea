//! Font faces, fallback chains and size-specific handles.
//!
//! A `FontBook` holds every loaded face in priority order plus a built-in
//! block face that always resolves. Each character is drawn with the first
//! face that has a glyph for it, so mixed-script lines work with a Latin
//! primary font and a CJK fallback.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use thiserror::Error;

use super::script::is_wide;

/// Errors that can occur while loading a font file.
#[derive(Error, Debug)]
pub enum FontError {
    #[error("Failed to read font '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse font '{name}': {message}")]
    ParseError { name: String, message: String },
}

/// Placement of a rasterized glyph relative to the pen position and baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphMetrics {
    /// Offset from the pen to the bitmap's left edge.
    pub xmin: i32,
    /// Offset from the baseline to the bitmap's bottom edge (positive is up).
    pub ymin: i32,
    pub width: usize,
    pub height: usize,
    /// Pen advance after this glyph.
    pub advance: f32,
}

/// Vertical metrics of a face at one size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Distance from the top of the line box to the baseline.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line box.
    pub descent: f32,
}

impl LineMetrics {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// A source of glyph outlines.
pub trait GlyphFace: Send + Sync {
    /// Face name used in logs.
    fn name(&self) -> &str;

    /// Whether this face has a real glyph for `ch`.
    fn has_glyph(&self, ch: char) -> bool;

    fn line_metrics(&self, px: f32) -> LineMetrics;

    fn advance(&self, ch: char, px: f32) -> f32;

    /// Rasterize to an 8-bit coverage bitmap (row-major, `width * height`).
    fn rasterize(&self, ch: char, px: f32) -> (GlyphMetrics, Vec<u8>);
}

/// TrueType/OpenType face rasterized with fontdue.
pub struct TrueTypeFace {
    name: String,
    font: Font,
}

impl TrueTypeFace {
    /// Parse a face from raw font bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, FontError> {
        let name = name.into();
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|e| {
            FontError::ParseError {
                name: name.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { name, font })
    }

    /// Load a face from a file.
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let bytes = fs::read(path).map_err(|source| FontError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, &bytes)
    }
}

impl GlyphFace for TrueTypeFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_glyph(&self, ch: char) -> bool {
        ch.is_whitespace() || self.font.lookup_glyph_index(ch) != 0
    }

    fn line_metrics(&self, px: f32) -> LineMetrics {
        match self.font.horizontal_line_metrics(px) {
            Some(m) => LineMetrics {
                ascent: m.ascent,
                descent: -m.descent,
            },
            None => BlockFace.line_metrics(px),
        }
    }

    fn advance(&self, ch: char, px: f32) -> f32 {
        self.font.metrics(ch, px).advance_width
    }

    fn rasterize(&self, ch: char, px: f32) -> (GlyphMetrics, Vec<u8>) {
        let (m, coverage) = self.font.rasterize(ch, px);
        (
            GlyphMetrics {
                xmin: m.xmin,
                ymin: m.ymin,
                width: m.width,
                height: m.height,
                advance: m.advance_width,
            },
            coverage,
        )
    }
}

/// Built-in face that draws every character as a hollow box.
///
/// Narrow characters advance 0.6 em, wide (CJK) characters a full em, and
/// spaces 0.3 em. It never fails, which makes it the last resort of every
/// fallback chain and a deterministic face for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFace;

impl GlyphFace for BlockFace {
    fn name(&self) -> &str {
        "builtin-block"
    }

    fn has_glyph(&self, _ch: char) -> bool {
        true
    }

    fn line_metrics(&self, px: f32) -> LineMetrics {
        let ascent = px * 4.0 / 5.0;
        LineMetrics {
            ascent,
            descent: px - ascent,
        }
    }

    fn advance(&self, ch: char, px: f32) -> f32 {
        if ch == '\u{3000}' {
            px
        } else if ch.is_whitespace() {
            px * 3.0 / 10.0
        } else if is_wide(ch) {
            px
        } else {
            px * 3.0 / 5.0
        }
    }

    fn rasterize(&self, ch: char, px: f32) -> (GlyphMetrics, Vec<u8>) {
        let advance = self.advance(ch, px);
        if ch.is_whitespace() {
            return (
                GlyphMetrics {
                    advance,
                    ..GlyphMetrics::default()
                },
                Vec::new(),
            );
        }

        let inset = (advance * 0.1).round() as usize;
        let width = (advance.round() as usize).saturating_sub(inset * 2).max(1);
        let height = ((px * 0.7).round() as usize).max(1);
        let line = ((px / 12.0).round() as usize).max(1);

        let mut coverage = vec![0u8; width * height];
        for y in 0..height {
            for x in 0..width {
                let edge = x < line || y < line || x + line >= width || y + line >= height;
                if edge {
                    coverage[y * width + x] = 255;
                }
            }
        }

        (
            GlyphMetrics {
                xmin: inset as i32,
                ymin: 0,
                width,
                height,
                advance,
            },
            coverage,
        )
    }
}

/// Ordered fallback chain of faces.
pub struct FontBook {
    faces: Vec<Arc<dyn GlyphFace>>,
    fallback: BlockFace,
}

impl FontBook {
    /// Book with only the built-in block face.
    pub fn builtin() -> Self {
        Self {
            faces: Vec::new(),
            fallback: BlockFace,
        }
    }

    /// Book with the given faces in priority order.
    pub fn from_faces(faces: Vec<Arc<dyn GlyphFace>>) -> Self {
        Self {
            faces,
            fallback: BlockFace,
        }
    }

    /// Load every readable face among `paths`, in order.
    ///
    /// Missing or unparseable files are skipped with a warning; if nothing
    /// loads, the book falls back to the built-in face.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Self {
        let mut faces: Vec<Arc<dyn GlyphFace>> = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                tracing::debug!("[Fonts] Not found: {}", path.display());
                continue;
            }
            match TrueTypeFace::load(path) {
                Ok(face) => {
                    tracing::info!("[Fonts] Loaded {}", face.name());
                    faces.push(Arc::new(face));
                }
                Err(e) => tracing::warn!("[Fonts] {}", e),
            }
        }

        if faces.is_empty() {
            tracing::warn!("[Fonts] No usable font found, using built-in block glyphs");
        }

        Self::from_faces(faces)
    }

    /// Number of loaded faces (the built-in face is not counted).
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Face used for line metrics.
    pub fn primary(&self) -> &dyn GlyphFace {
        match self.faces.first() {
            Some(face) => face.as_ref(),
            None => &self.fallback,
        }
    }

    /// First face with a glyph for `ch`.
    pub fn face_for(&self, ch: char) -> &dyn GlyphFace {
        self.faces
            .iter()
            .find(|f| f.has_glyph(ch))
            .map(|f| f.as_ref())
            .unwrap_or(&self.fallback)
    }

    /// Size-specific handle.
    pub fn sized(self: &Arc<Self>, px: u32) -> SizedFont {
        SizedFont {
            book: Arc::clone(self),
            px: px.max(1) as f32,
        }
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::builtin()
    }
}

/// One rasterized glyph positioned on a canvas.
#[derive(Debug, Clone)]
pub struct PlacedGlyph {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<u8>,
}

/// A font book at one pixel size.
#[derive(Clone)]
pub struct SizedFont {
    book: Arc<FontBook>,
    px: f32,
}

impl SizedFont {
    pub fn px(&self) -> f32 {
        self.px
    }

    pub fn line_metrics(&self) -> LineMetrics {
        self.book.primary().line_metrics(self.px)
    }

    /// Pen advance of a string, unrounded.
    pub fn advance(&self, text: &str) -> f32 {
        text.chars()
            .map(|ch| self.book.face_for(ch).advance(ch, self.px))
            .sum()
    }

    /// Box of a string: rounded-up advance by line height.
    ///
    /// Empty text measures `(0, 0)`.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        if text.is_empty() {
            return (0, 0);
        }
        let width = self.advance(text).ceil().max(0.0) as u32;
        let height = self.line_metrics().height().ceil().max(0.0) as u32;
        (width, height)
    }

    /// Rasterize a string with its line box's top-left corner at `(x, top)`.
    pub fn layout(&self, text: &str, x: i32, top: i32) -> Vec<PlacedGlyph> {
        let baseline = top + self.line_metrics().ascent.round() as i32;
        let mut pen = x as f32;
        let mut glyphs = Vec::with_capacity(text.chars().count());

        for ch in text.chars() {
            let face = self.book.face_for(ch);
            let (m, coverage) = face.rasterize(ch, self.px);
            if m.width > 0 && m.height > 0 {
                glyphs.push(PlacedGlyph {
                    x: pen.round() as i32 + m.xmin,
                    y: baseline - m.height as i32 - m.ymin,
                    width: m.width,
                    height: m.height,
                    coverage,
                });
            }
            pen += m.advance;
        }

        glyphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_face_advances() {
        let face = BlockFace;
        assert!((face.advance('A', 10.0) - 6.0).abs() < 1e-6);
        assert!((face.advance('食', 10.0) - 10.0).abs() < 1e-6);
        assert!((face.advance(' ', 10.0) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn block_face_draws_hollow_box() {
        let (m, coverage) = BlockFace.rasterize('A', 48.0);
        assert_eq!(coverage.len(), m.width * m.height);
        assert_eq!(coverage[0], 255);
        let center = (m.height / 2) * m.width + m.width / 2;
        assert_eq!(coverage[center], 0);

        let (space, empty) = BlockFace.rasterize(' ', 48.0);
        assert_eq!(space.width, 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn empty_book_falls_back() {
        let book = Arc::new(FontBook::builtin());
        assert!(book.is_empty());
        assert_eq!(book.face_for('食').name(), "builtin-block");

        let font = book.sized(20);
        assert_eq!(font.measure(""), (0, 0));
        assert_eq!(font.measure("AB"), (24, 20));
        assert_eq!(font.measure("食"), (20, 20));
    }

    #[test]
    fn load_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        fs::write(&bogus, b"not a font").unwrap();

        let book = FontBook::load(&[dir.path().join("missing.ttf"), bogus]);
        assert!(book.is_empty());
        assert_eq!(book.primary().name(), "builtin-block");
    }

    #[test]
    fn layout_places_glyphs_on_baseline() {
        let book = Arc::new(FontBook::builtin());
        let font = book.sized(20);
        let glyphs = font.layout("A A", 5, 10);
        assert_eq!(glyphs.len(), 2);
        // ascent 16, glyph height 14, bottom on the baseline
        assert_eq!(glyphs[0].y + glyphs[0].height as i32, 26);
        assert!(glyphs[1].x > glyphs[0].x);
    }
}
