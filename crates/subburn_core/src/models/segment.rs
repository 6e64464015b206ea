//! Timed segment of tokens.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::token::Token;

static NEXT_SEGMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique segment identity, used as the render cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(u64);

impl SegmentId {
    fn next() -> Self {
        Self(NEXT_SEGMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A timed run of tokens shown in one slot.
///
/// Times are in seconds. Segments are never mutated after construction;
/// clones share the same identity and token storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    id: SegmentId,
    start: f64,
    end: f64,
    tokens: Arc<[Token]>,
    text: Arc<str>,
}

impl Segment {
    /// Create a segment with raw text derived from the tokens.
    ///
    /// Returns None unless both times are finite and `start < end`.
    pub fn new(start: f64, end: f64, tokens: Vec<Token>) -> Option<Self> {
        let text: String = tokens.iter().map(Token::text).collect();
        Self::with_text(start, end, tokens, text)
    }

    /// Create a segment with explicit raw text.
    ///
    /// Tokens with empty text are dropped.
    pub fn with_text(
        start: f64,
        end: f64,
        mut tokens: Vec<Token>,
        text: impl Into<String>,
    ) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() || start >= end {
            return None;
        }
        tokens.retain(|t| !t.text().is_empty());
        Some(Self {
            id: SegmentId::next(),
            start,
            end,
            tokens: tokens.into(),
            text: Arc::from(text.into()),
        })
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    /// Start time in seconds.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End time in seconds.
    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True if `t` lies within `[start, end]`.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}
