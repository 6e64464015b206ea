//! JSON timed-text records.
//!
//! Accepts a top-level list of items, or an object holding the list under
//! `items`, `subtitles` or `segments`. Each item has `start`/`end` and one
//! or more token sources, tried in order: a token list, reading pairs,
//! inline ruby markup, then the raw text (annotated later).

use serde_json::{Map, Value};

use super::error::RecordError;
use super::markup::{tokens_from_markup, tokens_from_pairs, value_text};
use super::timestamp::parse_timestamp;
use super::{RecordOptions, TimedRecord};
use crate::models::{Color, IconKind, Palette, Token, WordClass};

const TEXT_KEYS: [&str; 3] = ["text", "word", "token"];
const RUBY_KEYS: [&str; 3] = ["ruby", "reading", "furigana"];
const TYPE_KEYS: [&str; 3] = ["type", "pos", "tag"];

/// Token type that marks a speaker icon.
const SPEAKER_TYPE: &str = "speaker";

/// The item list of a records document.
///
/// Anything else (a scalar, an object without a known list) has no items.
pub fn record_items(doc: &Value) -> &[Value] {
    match doc {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => ["items", "subtitles", "segments"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

/// Parse one item into a record.
pub fn parse_item(
    index: usize,
    item: &Value,
    options: &RecordOptions,
    palette: Option<&Palette>,
) -> Result<TimedRecord, RecordError> {
    let Some(obj) = item.as_object() else {
        return Err(RecordError::NotAnObject { index });
    };

    let start = time_field(index, obj, "start")?;
    let end = time_field(index, obj, "end")?;

    let text = obj
        .get(&options.text_key)
        .and_then(value_text)
        .or_else(|| obj.get("text").and_then(value_text))
        .unwrap_or_default();

    let mut record = TimedRecord::new(start, end, text);
    record.tokens = item_tokens(obj, options, palette);
    Ok(record)
}

fn time_field(index: usize, obj: &Map<String, Value>, key: &str) -> Result<f64, RecordError> {
    let value = obj.get(key).unwrap_or(&Value::Null);
    parse_timestamp(value).ok_or_else(|| RecordError::timestamp(index, value))
}

/// Tokens from the first source the item provides, or None to fall back to
/// the raw text.
fn item_tokens(
    obj: &Map<String, Value>,
    options: &RecordOptions,
    palette: Option<&Palette>,
) -> Option<Vec<Token>> {
    if let Some(list) = obj
        .get(&options.tokens_key)
        .and_then(Value::as_array)
        .filter(|l| !l.is_empty())
    {
        return Some(
            list.iter()
                .filter_map(|t| t.as_object())
                .filter_map(|t| token_from_object(t, palette))
                .collect(),
        );
    }

    if let Some(pairs) = obj
        .get(&options.pairs_key)
        .filter(|p| p.as_array().is_some_and(|a| !a.is_empty()))
    {
        return Some(tokens_from_pairs(pairs));
    }

    if let Some(markup) = options
        .ruby_key
        .as_deref()
        .and_then(|key| obj.get(key))
        .and_then(value_text)
    {
        return Some(tokens_from_markup(&markup));
    }

    None
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| obj.get(*k).and_then(value_text))
}

/// Build a token from `{text|word|token, ruby|reading|furigana, color, type|pos|tag}`.
///
/// Tokens without text are skipped. A `speaker` type becomes an icon.
/// An explicit color wins over the palette color for the token's type.
pub fn token_from_object(obj: &Map<String, Value>, palette: Option<&Palette>) -> Option<Token> {
    let text = first_text(obj, &TEXT_KEYS)?;
    let tag = first_text(obj, &TYPE_KEYS);

    if tag.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(SPEAKER_TYPE)) {
        return Some(Token::icon(IconKind::Speaker));
    }

    let class = tag.as_deref().map(WordClass::parse);
    let color = obj
        .get("color")
        .and_then(Value::as_str)
        .and_then(Color::from_hex)
        .or_else(|| {
            let class = class.as_ref()?;
            palette?.color_for(class)
        });

    Some(
        Token::new(text)
            .ruby(first_text(obj, &RUBY_KEYS))
            .color(color)
            .class(class),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opts() -> RecordOptions {
        RecordOptions::default()
    }

    #[test]
    fn item_lists_in_all_shapes() {
        assert_eq!(record_items(&json!([{}, {}])).len(), 2);
        assert_eq!(record_items(&json!({"items": [{}]})).len(), 1);
        assert_eq!(record_items(&json!({"subtitles": [{}, {}, {}]})).len(), 3);
        assert_eq!(record_items(&json!({"segments": [{}]})).len(), 1);
        assert!(record_items(&json!({"other": [{}]})).is_empty());
        assert!(record_items(&json!(42)).is_empty());
    }

    #[test]
    fn token_fields_and_aliases() {
        let palette = Palette::new().with(WordClass::Verb, Color::from_rgb(0, 255, 0));
        let item = json!({
            "start": "00:00:01,000",
            "end": 2.5,
            "text": "食べる",
            "tokens": [
                {"word": "食べる", "reading": "たべる", "pos": "verb"},
                {"token": "!", "color": "#f00"},
                {"reading": "no text"}
            ]
        });

        let record = parse_item(0, &item, &opts(), Some(&palette)).unwrap();
        assert_eq!((record.start, record.end), (1.0, 2.5));

        let tokens = record.tokens.unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].ruby_text(), Some("たべる"));
        assert_eq!(tokens[0].word_class(), Some(&WordClass::Verb));
        assert_eq!(tokens[0].color_override(), Some(Color::from_rgb(0, 255, 0)));
        assert_eq!(tokens[1].color_override(), Some(Color::from_rgb(255, 0, 0)));
    }

    #[test]
    fn speaker_type_becomes_icon() {
        let obj = json!({"text": "🔊", "type": "speaker"});
        let token = token_from_object(obj.as_object().unwrap(), None).unwrap();
        assert!(token.is_icon());
    }

    #[test]
    fn source_priority() {
        let item = json!({
            "start": 0, "end": 1, "text": "raw",
            "tokens": [{"text": "tok"}],
            "furigana_pairs": [["pair", "p"]],
            "ruby": "<mk>[m]"
        });
        let options = RecordOptions {
            ruby_key: Some("ruby".to_string()),
            ..opts()
        };
        let tokens = parse_item(0, &item, &options, None).unwrap().tokens.unwrap();
        assert_eq!(tokens[0].text(), "tok");

        let item = json!({"start": 0, "end": 1, "furigana_pairs": [["pair", "p"]], "ruby": "<mk>[m]"});
        let tokens = parse_item(0, &item, &options, None).unwrap().tokens.unwrap();
        assert_eq!(tokens[0].text(), "pair");

        let item = json!({"start": 0, "end": 1, "ruby": "<mk>[m]"});
        let tokens = parse_item(0, &item, &options, None).unwrap().tokens.unwrap();
        assert_eq!(tokens[0].ruby_text(), Some("m"));

        let item = json!({"start": 0, "end": 1, "text": "raw"});
        assert!(parse_item(0, &item, &options, None).unwrap().tokens.is_none());
    }

    #[test]
    fn custom_text_key_falls_back_to_text() {
        let options = RecordOptions {
            text_key: "ja".to_string(),
            ..opts()
        };
        let item = json!({"start": 0, "end": 1, "ja": "日本語", "text": "Japanese"});
        assert_eq!(parse_item(0, &item, &options, None).unwrap().text, "日本語");

        let item = json!({"start": 0, "end": 1, "text": "Japanese"});
        assert_eq!(parse_item(0, &item, &options, None).unwrap().text, "Japanese");
    }

    #[test]
    fn bad_items_are_errors() {
        assert!(matches!(
            parse_item(3, &json!("nope"), &opts(), None),
            Err(RecordError::NotAnObject { index: 3 })
        ));
        assert!(matches!(
            parse_item(1, &json!({"start": "1 second", "end": 2}), &opts(), None),
            Err(RecordError::InvalidTimestamp { index: 1, .. })
        ));
        assert!(matches!(
            parse_item(1, &json!({"end": 2}), &opts(), None),
            Err(RecordError::InvalidTimestamp { .. })
        ));
    }
}
