//! Phonetic annotation backends.
//!
//! Records that carry only raw text are turned into tokens by an
//! `Annotator`. The backend is picked once, when records are loaded:
//! - `PlainAnnotator`: one unannotated token
//! - `KanaRomajiAnnotator`: romaji over every kana run
//! - `DictionaryAnnotator`: longest-match readings from a word list
//!
//! The `kana` passes post-process annotated tokens (trimming kana from
//! readings, splitting kana affixes, romanizing bare kana).

pub mod kana;
mod romaji;

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::models::Token;
use crate::records::RecordError;
use crate::text::script::{is_kana, is_katakana};

pub use kana::{apply_kana_romaji, expand_kana_affixes, strip_kana_affixes, strip_kana_reading};
pub use romaji::{kana_char_romaji, kana_to_romaji};

/// Turns raw text into annotated tokens.
pub trait Annotator: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Tokens for `text`. Empty text gives no tokens.
    fn annotate(&self, text: &str) -> Vec<Token>;
}

/// Look up a built-in backend by name (`plain`, `kana_romaji`).
///
/// Dictionary backends need a word list and are built directly.
pub fn annotator_by_name(name: &str) -> Option<Box<dyn Annotator>> {
    match name.trim().to_lowercase().as_str() {
        "plain" | "none" => Some(Box::new(PlainAnnotator)),
        "kana_romaji" | "romaji" => Some(Box::new(KanaRomajiAnnotator)),
        _ => None,
    }
}

/// No annotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainAnnotator;

impl Annotator for PlainAnnotator {
    fn name(&self) -> &str {
        "plain"
    }

    fn annotate(&self, text: &str) -> Vec<Token> {
        if text.is_empty() {
            Vec::new()
        } else {
            vec![Token::new(text)]
        }
    }
}

/// Romaji readings over kana runs; everything else stays plain.
#[derive(Debug, Clone, Copy, Default)]
pub struct KanaRomajiAnnotator;

impl Annotator for KanaRomajiAnnotator {
    fn name(&self) -> &str {
        "kana_romaji"
    }

    fn annotate(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut run = String::new();
        let mut run_script = Script::Other;

        for ch in text.chars() {
            let script = match Script::of(ch) {
                // The prolonged sound mark extends hiragana runs too
                Script::Katakana if ch == 'ー' && run_script == Script::Hiragana => run_script,
                script => script,
            };
            if !run.is_empty() && script != run_script {
                tokens.push(romaji_token(std::mem::take(&mut run), run_script));
            }
            run_script = script;
            run.push(ch);
        }
        if !run.is_empty() {
            tokens.push(romaji_token(run, run_script));
        }
        tokens
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Hiragana,
    Katakana,
    Other,
}

impl Script {
    fn of(ch: char) -> Self {
        if !is_kana(ch) {
            Script::Other
        } else if is_katakana(ch) {
            Script::Katakana
        } else {
            Script::Hiragana
        }
    }
}

fn romaji_token(run: String, script: Script) -> Token {
    let reading = (script != Script::Other)
        .then(|| kana_to_romaji(&run))
        .flatten();
    Token::new(run).ruby(reading)
}

/// Longest-match readings from a word list.
///
/// Characters not covered by any entry are grouped into plain tokens.
#[derive(Debug, Clone, Default)]
pub struct DictionaryAnnotator {
    entries: HashMap<String, String>,
    /// Longest key, in characters.
    max_len: usize,
}

impl DictionaryAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(word, reading)` pairs.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut dict = Self::new();
        for (word, reading) in entries {
            dict.insert(word, reading);
        }
        dict
    }

    /// Add an entry. Empty words or readings are ignored.
    pub fn insert(&mut self, word: impl Into<String>, reading: impl Into<String>) {
        let (word, reading) = (word.into(), reading.into());
        if word.is_empty() || reading.trim().is_empty() {
            return;
        }
        self.max_len = self.max_len.max(word.chars().count());
        self.entries.insert(word, reading);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from a JSON object (`{"word": "reading"}`) or a list of
    /// `[word, reading]` pairs.
    pub fn from_json(value: &Value) -> Self {
        let mut dict = Self::new();
        match value {
            Value::Object(map) => {
                for (word, reading) in map {
                    if let Some(reading) = reading.as_str() {
                        dict.insert(word.as_str(), reading);
                    }
                }
            }
            Value::Array(pairs) => {
                for pair in pairs {
                    if let (Some(word), Some(reading)) = (
                        pair.get(0).and_then(Value::as_str),
                        pair.get(1).and_then(Value::as_str),
                    ) {
                        dict.insert(word, reading);
                    }
                }
            }
            _ => {}
        }
        dict
    }

    /// Load a JSON word list from disk.
    pub fn load(path: &Path) -> Result<Self, RecordError> {
        let content = std::fs::read_to_string(path).map_err(|e| RecordError::read(path, e))?;
        let value: Value = serde_json::from_str(&content)?;
        let dict = Self::from_json(&value);
        tracing::info!(
            "[Annotate] Loaded {} dictionary entries from {}",
            dict.len(),
            path.display()
        );
        Ok(dict)
    }
}

impl Annotator for DictionaryAnnotator {
    fn name(&self) -> &str {
        "dictionary"
    }

    fn annotate(&self, text: &str) -> Vec<Token> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut plain = String::new();
        let mut i = 0;

        'outer: while i < chars.len() {
            let longest = self.max_len.min(chars.len() - i);
            for len in (1..=longest).rev() {
                let word: String = chars[i..i + len].iter().collect();
                if let Some(reading) = self.entries.get(&word) {
                    if !plain.is_empty() {
                        tokens.push(Token::new(std::mem::take(&mut plain)));
                    }
                    tokens.push(Token::with_ruby(word, reading.as_str()));
                    i += len;
                    continue 'outer;
                }
            }
            plain.push(chars[i]);
            i += 1;
        }

        if !plain.is_empty() {
            tokens.push(Token::new(plain));
        }
        tokens
    }
}
