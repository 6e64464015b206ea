//! Re-tokenization for finer split points.

use crate::models::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Word,
    Mark,
}

fn classify(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Space
    } else if ch.is_alphanumeric() || ch == '\'' || ch == '\u{2019}' {
        CharClass::Word
    } else {
        CharClass::Mark
    }
}

/// Split space-separated text into words, whitespace runs and single marks.
///
/// Concatenating the pieces gives back the input.
pub fn split_words(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut current: Option<CharClass> = None;

    for (i, ch) in text.char_indices() {
        let class = classify(ch);
        let boundary = match current {
            None => false,
            Some(CharClass::Mark) => true,
            Some(prev) => prev != class,
        };
        if boundary {
            pieces.push(&text[start..i]);
            start = i;
        }
        current = Some(class);
    }

    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Break tokens into the smallest pieces a line may be split between.
///
/// `spaced` says whether the segment's text contains whitespace. Spaced
/// text breaks only between words: tokens with whitespace are split into
/// words and whitespace-free tokens stay whole. Unspaced text is split per
/// character. Annotated tokens and icons are atomic either way.
pub fn retokenize(tokens: &[Token], spaced: bool) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());

    for token in tokens {
        let text = token.text();
        if token.has_ruby() || token.is_icon() || text.chars().count() <= 1 {
            out.push(token.clone());
        } else if spaced {
            if text.chars().any(char::is_whitespace) {
                out.extend(split_words(text).into_iter().map(|w| token.with_text(w)));
            } else {
                out.push(token.clone());
            }
        } else {
            out.extend(
                text.char_indices()
                    .map(|(i, c)| token.with_text(&text[i..i + c.len_utf8()])),
            );
        }
    }

    out
}

/// Drop leading and trailing whitespace-only tokens.
pub fn trim_whitespace(tokens: &[Token]) -> &[Token] {
    let start = tokens
        .iter()
        .position(|t| !t.is_whitespace())
        .unwrap_or(tokens.len());
    let end = tokens
        .iter()
        .rposition(|t| !t.is_whitespace())
        .map(|i| i + 1)
        .unwrap_or(start);
    &tokens[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, IconKind};

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::text).collect()
    }

    #[test]
    fn splits_words_spaces_and_marks() {
        assert_eq!(
            split_words("Don't stop, now!"),
            vec!["Don't", " ", "stop", ",", " ", "now", "!"]
        );
        assert_eq!(split_words("a  b"), vec!["a", "  ", "b"]);
        assert_eq!(split_words("..."), vec![".", ".", "."]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn words_keep_digits_and_accents() {
        assert_eq!(split_words("café 42"), vec!["café", " ", "42"]);
    }

    #[test]
    fn retokenize_spaced_text_by_word() {
        let tokens = vec![
            Token::new("hello world"),
            Token::new(" "),
            Token::new("ABC").color(Some(Color::BLACK)),
            Token::with_ruby("日本", "にほん"),
            Token::icon(IconKind::Speaker),
        ];
        let out = retokenize(&tokens, true);
        assert_eq!(
            texts(&out),
            vec!["hello", " ", "world", " ", "ABC", "日本", "\u{1F50A}"]
        );
        assert_eq!(out[4].color_override(), Some(Color::BLACK));
        assert!(out[5].has_ruby());
        assert!(out[6].is_icon());
    }

    #[test]
    fn retokenize_unspaced_text_per_character() {
        let out = retokenize(&[Token::new("今日は")], false);
        assert_eq!(texts(&out), vec!["今", "日", "は"]);

        let tokens = vec![Token::new("ABC"), Token::with_ruby("日本", "にほん")];
        let out = retokenize(&tokens, false);
        assert_eq!(texts(&out), vec!["A", "B", "C", "日本"]);
    }

    #[test]
    fn trims_whitespace_tokens() {
        let tokens = vec![Token::new(" "), Token::new("a"), Token::new(" "), Token::new("b"), Token::new("  ")];
        assert_eq!(texts(trim_whitespace(&tokens)), vec!["a", " ", "b"]);
        let blank = vec![Token::new(" ")];
        assert!(trim_whitespace(&blank).is_empty());
    }
}
