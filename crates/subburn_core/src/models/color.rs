//! Colors, semantic word classes and class-to-color palettes.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// RGB color.
///
/// Serialized as a `#rrggbb` hex string so config files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);

    /// Create a color from RGB components.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb` (the `#` is optional).
    ///
    /// Returns None for anything else.
    pub fn from_hex(value: &str) -> Option<Self> {
        let text = value.trim().trim_start_matches('#');

        let expanded: String = match text.len() {
            3 => text.chars().flat_map(|c| [c, c]).collect(),
            6 => text.to_string(),
            _ => return None,
        };

        let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
        Some(Self::from_rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert to an RGBA pixel with the given alpha.
    pub fn to_rgba(&self, alpha: u8) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, alpha])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid hex color '{}'", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Semantic word class attached to a text token.
///
/// Known grammatical tags map to named variants; anything else is kept
/// verbatim (lowercased) in `Other` so user palettes can address it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WordClass {
    Noun,
    ProperNoun,
    Pronoun,
    Verb,
    Adjective,
    Adverb,
    Particle,
    Auxiliary,
    Conjunction,
    Interjection,
    Number,
    Punctuation,
    Other(String),
}

impl WordClass {
    /// Parse a tag as it appears in token records or tagger output.
    ///
    /// Accepts English names, common abbreviations and the Japanese
    /// part-of-speech names used by morphological taggers.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        match tag.as_str() {
            "noun" | "n" | "名詞" => WordClass::Noun,
            "proper_noun" | "propn" | "name" | "固有名詞" => WordClass::ProperNoun,
            "pronoun" | "pron" | "代名詞" => WordClass::Pronoun,
            "verb" | "v" | "動詞" => WordClass::Verb,
            "adjective" | "adj" | "i_adjective" | "na_adjective" | "形容詞" | "形状詞" => {
                WordClass::Adjective
            }
            "adverb" | "adv" | "副詞" => WordClass::Adverb,
            "particle" | "part" | "助詞" => WordClass::Particle,
            "auxiliary" | "aux" | "助動詞" => WordClass::Auxiliary,
            "conjunction" | "conj" | "cconj" | "sconj" | "接続詞" => WordClass::Conjunction,
            "interjection" | "intj" | "感動詞" => WordClass::Interjection,
            "number" | "num" | "numeral" | "数詞" => WordClass::Number,
            "punctuation" | "punct" | "補助記号" | "記号" => WordClass::Punctuation,
            _ => WordClass::Other(tag),
        }
    }

    /// Canonical tag name.
    pub fn as_str(&self) -> &str {
        match self {
            WordClass::Noun => "noun",
            WordClass::ProperNoun => "proper_noun",
            WordClass::Pronoun => "pronoun",
            WordClass::Verb => "verb",
            WordClass::Adjective => "adjective",
            WordClass::Adverb => "adverb",
            WordClass::Particle => "particle",
            WordClass::Auxiliary => "auxiliary",
            WordClass::Conjunction => "conjunction",
            WordClass::Interjection => "interjection",
            WordClass::Number => "number",
            WordClass::Punctuation => "punctuation",
            WordClass::Other(tag) => tag,
        }
    }

    /// Broader class for compound tags such as `particle_wa`.
    fn family(&self) -> Option<WordClass> {
        match self {
            WordClass::Other(tag) => {
                let (head, _) = tag.split_once('_')?;
                match WordClass::parse(head) {
                    WordClass::Other(_) => None,
                    class => Some(class),
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for WordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup from word class to color, applied once when records are loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    entries: HashMap<WordClass, Color>,
}

impl Palette {
    /// Create an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grammar highlighting scheme for learner subtitles.
    pub fn grammar() -> Self {
        Self::new()
            .with(WordClass::Noun, Color::from_rgb(255, 255, 150))
            .with(WordClass::ProperNoun, Color::from_rgb(255, 180, 180))
            .with(WordClass::Pronoun, Color::from_rgb(255, 220, 120))
            .with(WordClass::Verb, Color::from_rgb(100, 255, 100))
            .with(WordClass::Adjective, Color::from_rgb(255, 200, 100))
            .with(WordClass::Adverb, Color::from_rgb(200, 100, 255))
            .with(WordClass::Particle, Color::from_rgb(200, 200, 200))
            .with(WordClass::Auxiliary, Color::from_rgb(150, 200, 150))
            .with(WordClass::Conjunction, Color::from_rgb(200, 150, 200))
            .with(WordClass::Interjection, Color::from_rgb(255, 255, 120))
            .with(WordClass::Number, Color::from_rgb(120, 255, 180))
            .with(WordClass::Punctuation, Color::from_rgb(180, 180, 180))
    }

    /// Builder: add or replace an entry.
    pub fn with(mut self, class: WordClass, color: Color) -> Self {
        self.insert(class, color);
        self
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, class: WordClass, color: Color) {
        self.entries.insert(class, color);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the palette has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a class to a color.
    ///
    /// Compound tags (`particle_wa`) fall back to their family (`particle`)
    /// when they have no entry of their own.
    pub fn color_for(&self, class: &WordClass) -> Option<Color> {
        if let Some(color) = self.entries.get(class) {
            return Some(*color);
        }
        class
            .family()
            .and_then(|family| self.entries.get(&family).copied())
    }

    /// Build a palette from a JSON object.
    ///
    /// Accepts either `{"types": {...}}` or a flat map; values may be hex
    /// strings or `{"color": "#hex"}` objects. Unparseable entries are skipped.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut palette = Self::new();
        let map = value
            .get("types")
            .and_then(|t| t.as_object())
            .or_else(|| value.as_object());

        let Some(map) = map else {
            return palette;
        };

        for (tag, entry) in map {
            if tag == "types" {
                continue;
            }
            let hex = match entry {
                serde_json::Value::String(s) => Some(s.as_str()),
                serde_json::Value::Object(obj) => obj.get("color").and_then(|c| c.as_str()),
                _ => None,
            };
            match hex.and_then(Color::from_hex) {
                Some(color) => palette.insert(WordClass::parse(tag), color),
                None => tracing::debug!("[Palette] Skipping entry '{}': no usable color", tag),
            }
        }

        palette
    }
}
