//! Annotated text token.

use super::color::{Color, WordClass};

/// Icon glyphs that can stand in a token position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    /// Speaker marker drawn before a line of dialogue.
    Speaker,
}

impl IconKind {
    /// Text drawn when the icon image is not available.
    pub fn fallback_text(&self) -> &'static str {
        match self {
            IconKind::Speaker => "\u{1F50A}",
        }
    }
}

/// What a token renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Ordinary text, optionally tagged with its word class.
    Text(Option<WordClass>),
    /// Square icon glyph.
    Icon(IconKind),
}

/// A run of main text with an optional phonetic annotation above it.
///
/// Tokens are immutable once built; the builder methods consume `self`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    text: String,
    ruby: Option<String>,
    color: Option<Color>,
    kind: TokenKind,
}

impl Token {
    /// Plain text token.
    ///
    /// Empty text is accepted here; segments drop empty tokens when built.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ruby: None,
            color: None,
            kind: TokenKind::Text(None),
        }
    }

    /// Text token with an annotation. Empty annotations are dropped.
    pub fn with_ruby(text: impl Into<String>, ruby: impl Into<String>) -> Self {
        Self::new(text).ruby(Some(ruby.into()))
    }

    /// Icon token. `text` is kept for the segment's raw text.
    pub fn icon(kind: IconKind) -> Self {
        Self {
            text: kind.fallback_text().to_string(),
            ruby: None,
            color: None,
            kind: TokenKind::Icon(kind),
        }
    }

    /// Builder: set or clear the annotation.
    pub fn ruby(mut self, ruby: Option<String>) -> Self {
        self.ruby = ruby.filter(|r| !r.trim().is_empty());
        self
    }

    /// Builder: set the color override.
    pub fn color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Builder: set the word class of a text token.
    ///
    /// Has no effect on icon tokens.
    pub fn class(mut self, class: Option<WordClass>) -> Self {
        if let TokenKind::Text(_) = self.kind {
            self.kind = TokenKind::Text(class);
        }
        self
    }

    /// Copy of this token with different text, keeping color and class.
    ///
    /// The annotation is not carried over.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ruby: None,
            color: self.color,
            kind: self.kind.clone(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ruby_text(&self) -> Option<&str> {
        self.ruby.as_deref()
    }

    pub fn color_override(&self) -> Option<Color> {
        self.color
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Word class of a text token.
    pub fn word_class(&self) -> Option<&WordClass> {
        match &self.kind {
            TokenKind::Text(class) => class.as_ref(),
            TokenKind::Icon(_) => None,
        }
    }

    pub fn has_ruby(&self) -> bool {
        self.ruby.is_some()
    }

    pub fn is_icon(&self) -> bool {
        matches!(self.kind, TokenKind::Icon(_))
    }

    /// True for text tokens made only of whitespace.
    pub fn is_whitespace(&self) -> bool {
        !self.is_icon() && self.text.chars().all(char::is_whitespace)
    }
}
