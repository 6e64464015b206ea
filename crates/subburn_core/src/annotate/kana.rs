//! Kana post-processing passes over annotated tokens.
//!
//! Readings supplied for whole words usually include the word's kana
//! (`食べる` / `たべる`). These passes trim that kana from the reading,
//! split it into tokens of its own, and romanize bare kana.

use super::romaji::{kana_char_romaji, kana_to_romaji};
use crate::models::Token;
use crate::text::script::{has_kanji, is_kana_text, split_kana_affixes, to_hiragana};

/// Trim the kana prefix and suffix of `text` from its reading.
///
/// Returns None when `text` has no kanji, when nothing is left after
/// trimming, or when the remainder equals the text itself.
pub fn strip_kana_reading(text: &str, ruby: Option<&str>) -> Option<String> {
    let ruby = ruby?;
    if text.is_empty() || !has_kanji(text) {
        return None;
    }

    let (prefix, _, suffix) = split_kana_affixes(text);
    let (prefix, suffix) = (to_hiragana(prefix), to_hiragana(suffix));

    let mut trimmed = to_hiragana(ruby);
    if !prefix.is_empty() && trimmed.starts_with(&prefix) {
        trimmed.drain(..prefix.len());
    }
    if !suffix.is_empty() && trimmed.ends_with(&suffix) {
        trimmed.truncate(trimmed.len() - suffix.len());
    }

    let trimmed = trimmed.trim();
    if trimmed.is_empty() || trimmed == to_hiragana(text) {
        return None;
    }
    Some(trimmed.to_string())
}

/// Apply `strip_kana_reading` to every text token.
pub fn strip_kana_affixes(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|token| {
            if token.is_icon() || !token.has_ruby() {
                return token;
            }
            let stripped = strip_kana_reading(token.text(), token.ruby_text());
            token.ruby(stripped)
        })
        .collect()
}

/// Split kana prefixes and suffixes off kanji words into their own tokens.
///
/// The kanji core keeps the reading. With `add_romaji`, kana affixes and
/// kana-only tokens are split per character with romaji readings.
pub fn expand_kana_affixes(tokens: Vec<Token>, add_romaji: bool) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());

    for token in tokens {
        if token.text().is_empty() {
            continue;
        }
        if token.is_icon() {
            out.push(token);
            continue;
        }

        if !has_kanji(token.text()) {
            if add_romaji && is_kana_text(token.text()) {
                push_kana(&mut out, &token, token.text(), true);
            } else {
                out.push(token);
            }
            continue;
        }

        let (prefix, core, suffix) = split_kana_affixes(token.text());
        if prefix.is_empty() && suffix.is_empty() {
            out.push(token);
            continue;
        }

        push_kana(&mut out, &token, prefix, add_romaji);
        if !core.is_empty() {
            out.push(token.with_text(core).ruby(token.ruby_text().map(str::to_string)));
        }
        push_kana(&mut out, &token, suffix, add_romaji);
    }

    out
}

/// Push `kana` as one token, or one token per character with romaji.
fn push_kana(out: &mut Vec<Token>, source: &Token, kana: &str, per_char: bool) {
    if kana.is_empty() {
        return;
    }
    if per_char {
        for ch in kana.chars() {
            out.push(source.with_text(ch.to_string()).ruby(kana_char_romaji(ch)));
        }
    } else {
        out.push(source.with_text(kana));
    }
}

/// Give kana-only tokens without a reading their romaji.
pub fn apply_kana_romaji(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|token| {
            if token.is_icon() || token.has_ruby() || !is_kana_text(token.text()) {
                return token;
            }
            let mut chars = token.text().chars();
            let romaji = match (chars.next(), chars.next()) {
                (Some(ch), None) => kana_char_romaji(ch),
                _ => kana_to_romaji(token.text()),
            };
            match romaji {
                Some(r) if r != token.text() => token.ruby(Some(r)),
                _ => token,
            }
        })
        .collect()
}
