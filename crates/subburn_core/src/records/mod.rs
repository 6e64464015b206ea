//! Timed-text records to segments.
//!
//! Records come from JSON documents or SRT files. Each valid record becomes
//! one `Segment`; invalid records (bad times, `end <= start`, nothing to
//! show) are logged and dropped without failing the load.
//!
//! Token resolution per record, first match wins:
//! 1. an explicit token list
//! 2. reading pairs
//! 3. inline `<base>[reading]` markup
//! 4. the configured annotator over the raw text
//! 5. the raw text as one plain token
//!
//! Kana post-processing (`strip_kana`, `kana_romaji`) runs afterwards.

mod error;
pub mod json;
mod markup;
pub mod srt;
mod timestamp;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::annotate::{apply_kana_romaji, expand_kana_affixes, strip_kana_affixes, Annotator};
use crate::models::{Palette, Segment, Token};
use crate::split::split_words;

pub use error::RecordError;
pub use markup::{tokens_from_markup, tokens_from_pairs};
pub use timestamp::{parse_clock_time, parse_timestamp};

/// One timed-text entry before it becomes a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedRecord {
    /// Seconds.
    pub start: f64,
    /// Seconds.
    pub end: f64,
    /// Raw text.
    pub text: String,
    /// Pre-built tokens, if the record carried any.
    pub tokens: Option<Vec<Token>>,
}

impl TimedRecord {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            tokens: None,
        }
    }

    /// Builder: attach pre-built tokens.
    pub fn tokens(mut self, tokens: Vec<Token>) -> Self {
        self.tokens = Some(tokens);
        self
    }
}

/// Where to find things in a record and how to post-process its tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordOptions {
    /// Key of the raw text (falls back to `text`).
    #[serde(default = "default_text_key")]
    pub text_key: String,

    /// Key of inline `<base>[reading]` markup, if any.
    #[serde(default)]
    pub ruby_key: Option<String>,

    #[serde(default = "default_tokens_key")]
    pub tokens_key: String,

    #[serde(default = "default_pairs_key")]
    pub pairs_key: String,

    /// Trim kana affixes from readings and split them into their own tokens.
    #[serde(default)]
    pub strip_kana: bool,

    /// Romaji over bare kana (splits kana affixes per character).
    #[serde(default)]
    pub kana_romaji: bool,
}

fn default_text_key() -> String {
    "text".to_string()
}

fn default_tokens_key() -> String {
    "tokens".to_string()
}

fn default_pairs_key() -> String {
    "furigana_pairs".to_string()
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            text_key: default_text_key(),
            ruby_key: None,
            tokens_key: default_tokens_key(),
            pairs_key: default_pairs_key(),
            strip_kana: false,
            kana_romaji: false,
        }
    }
}

/// Loads records and resolves them into segments.
#[derive(Clone, Default)]
pub struct RecordLoader {
    options: RecordOptions,
    palette: Option<Palette>,
    annotator: Option<Arc<dyn Annotator>>,
}

impl RecordLoader {
    pub fn new(options: RecordOptions) -> Self {
        Self {
            options,
            palette: None,
            annotator: None,
        }
    }

    /// Builder: color tokens by their word class.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Builder: annotate records that carry only raw text.
    pub fn with_annotator(mut self, annotator: Arc<dyn Annotator>) -> Self {
        self.annotator = Some(annotator);
        self
    }

    pub fn options(&self) -> &RecordOptions {
        &self.options
    }

    /// Load a JSON records file.
    pub fn load_json(&self, path: &Path) -> Result<Vec<Segment>, RecordError> {
        let content = std::fs::read_to_string(path).map_err(|e| RecordError::read(path, e))?;
        let segments = self.parse_json(&content)?;
        tracing::info!(
            "[Records] {} segments from {}",
            segments.len(),
            path.display()
        );
        Ok(segments)
    }

    /// Parse a JSON records document.
    pub fn parse_json(&self, content: &str) -> Result<Vec<Segment>, RecordError> {
        let doc: Value = serde_json::from_str(content)?;
        Ok(self.segments_from_value(&doc))
    }

    /// Segments from an already parsed JSON document.
    pub fn segments_from_value(&self, doc: &Value) -> Vec<Segment> {
        let items = json::record_items(doc);
        if items.is_empty() {
            tracing::warn!("[Records] Document has no record list");
        }

        let results = items.iter().enumerate().map(|(index, item)| {
            let record = json::parse_item(index, item, &self.options, self.palette.as_ref())?;
            self.to_segment(index, record)
        });
        collect_valid(results)
    }

    /// Load an SRT file.
    pub fn load_srt(&self, path: &Path) -> Result<Vec<Segment>, RecordError> {
        let content = std::fs::read_to_string(path).map_err(|e| RecordError::read(path, e))?;
        let segments = self.parse_srt(&content);
        tracing::info!(
            "[Records] {} segments from {}",
            segments.len(),
            path.display()
        );
        Ok(segments)
    }

    /// Parse SRT content. Lines with ruby markup keep their readings.
    pub fn parse_srt(&self, content: &str) -> Vec<Segment> {
        let results = srt::parse_srt(content)
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let mut record = record?;
                if record.text.contains(">[") {
                    record.tokens = Some(tokens_from_markup(&record.text));
                }
                self.to_segment(index, record)
            });
        collect_valid(results)
    }

    /// Resolve a record's tokens and build its segment.
    pub fn to_segment(&self, index: usize, record: TimedRecord) -> Result<Segment, RecordError> {
        let TimedRecord {
            start,
            end,
            text,
            tokens,
        } = record;

        if end <= start {
            return Err(RecordError::InvalidInterval { index, start, end });
        }

        let mut tokens = match tokens {
            Some(tokens) => tokens,
            None => match &self.annotator {
                Some(annotator) => annotator.annotate(&text),
                None if text.is_empty() => Vec::new(),
                None => vec![Token::new(text.as_str())],
            },
        };
        tokens.retain(|t| !t.text().is_empty());
        if tokens.is_empty() {
            return Err(RecordError::EmptyPayload { index });
        }

        let tokens = self.postprocess(normalize_speaker(tokens));
        let text = if text.is_empty() {
            tokens.iter().map(Token::text).collect()
        } else {
            text
        };

        Segment::with_text(start, end, tokens, text)
            .ok_or(RecordError::InvalidInterval { index, start, end })
    }

    fn postprocess(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        let opts = &self.options;
        if opts.strip_kana {
            tokens = strip_kana_affixes(tokens);
        }
        if opts.strip_kana || opts.kana_romaji {
            tokens = expand_kana_affixes(tokens, opts.kana_romaji);
        }
        if opts.kana_romaji {
            tokens = apply_kana_romaji(tokens);
        }
        tokens
    }
}

fn collect_valid(results: impl Iterator<Item = Result<Segment, RecordError>>) -> Vec<Segment> {
    let mut dropped = 0;
    let segments: Vec<Segment> = results
        .filter_map(|r| match r {
            Ok(seg) => Some(seg),
            Err(e) => {
                tracing::warn!("[Records] Dropping record: {}", e);
                dropped += 1;
                None
            }
        })
        .collect();
    if dropped > 0 {
        tracing::info!("[Records] Dropped {} invalid record(s)", dropped);
    }
    segments
}

/// A speaker icon followed by one unannotated phrase: split the phrase into
/// words so it can wrap.
fn normalize_speaker(tokens: Vec<Token>) -> Vec<Token> {
    let splittable = matches!(
        tokens.as_slice(),
        [icon, phrase] if icon.is_icon()
            && !phrase.has_ruby()
            && phrase.text().chars().any(char::is_whitespace)
    );
    if !splittable {
        return tokens;
    }

    let mut tokens = tokens.into_iter();
    let mut out: Vec<Token> = tokens.next().into_iter().collect();
    if let Some(phrase) = tokens.next() {
        out.extend(split_words(phrase.text()).into_iter().map(|w| phrase.with_text(w)));
    }
    out
}
