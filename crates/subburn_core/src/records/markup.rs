//! Token sources embedded in records: reading pairs and inline ruby markup.

use serde_json::Value;

use crate::models::Token;

/// Build tokens from `[[text, reading], ...]`.
///
/// Entries that are not arrays or have empty text are skipped; a missing or
/// null reading gives a plain token.
pub fn tokens_from_pairs(pairs: &Value) -> Vec<Token> {
    let Some(pairs) = pairs.as_array() else {
        return Vec::new();
    };

    pairs
        .iter()
        .filter_map(|pair| {
            let pair = pair.as_array()?;
            let text = value_text(pair.first()?)?;
            let ruby = pair.get(1).and_then(value_text);
            Some(Token::new(text).ruby(ruby))
        })
        .collect()
}

/// Text of a scalar JSON value; None for null, containers and empty strings.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Parse `<base>[reading]` markup. Text outside markup becomes plain tokens.
///
/// Malformed markup is kept as plain text. Text without any markup yields a
/// single plain token.
pub fn tokens_from_markup(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        let Some((base, reading, consumed)) = parse_ruby_at(&rest[open..]) else {
            // Not markup: keep the '<' and continue after it
            plain.push_str(&rest[..open + 1]);
            rest = &rest[open + 1..];
            continue;
        };

        plain.push_str(&rest[..open]);
        if !plain.is_empty() {
            tokens.push(Token::new(std::mem::take(&mut plain)));
        }
        tokens.push(Token::with_ruby(base, reading));
        rest = &rest[open + consumed..];
    }
    plain.push_str(rest);
    if !plain.is_empty() {
        tokens.push(Token::new(plain));
    }

    if tokens.is_empty() && !text.is_empty() {
        tokens.push(Token::new(text));
    }
    tokens
}

/// Match `<base>[reading]` at the start of `s`, returning the parts and the
/// byte length consumed.
fn parse_ruby_at(s: &str) -> Option<(&str, &str, usize)> {
    let inner = s.strip_prefix('<')?;
    let close = inner.find('>')?;
    let base = &inner[..close];
    if base.is_empty() || base.contains('<') {
        return None;
    }

    let after = inner[close + 1..].strip_prefix('[')?;
    let end = after.find(']')?;
    let reading = &after[..end];
    if reading.is_empty() {
        return None;
    }

    // '<' + base + '>' + '[' + reading + ']'
    let consumed = 1 + base.len() + 1 + 1 + reading.len() + 1;
    Some((base, reading, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parts(tokens: &[Token]) -> Vec<(&str, Option<&str>)> {
        tokens.iter().map(|t| (t.text(), t.ruby_text())).collect()
    }

    #[test]
    fn markup_mixes_plain_and_ruby() {
        let tokens = tokens_from_markup("<今日>[きょう]は<晴>[は]れ");
        assert_eq!(
            parts(&tokens),
            vec![
                ("今日", Some("きょう")),
                ("は", None),
                ("晴", Some("は")),
                ("れ", None),
            ]
        );
    }

    #[test]
    fn markup_without_annotations_is_one_token() {
        assert_eq!(parts(&tokens_from_markup("plain text")), vec![("plain text", None)]);
        assert!(tokens_from_markup("").is_empty());
    }

    #[test]
    fn malformed_markup_stays_plain() {
        let tokens = tokens_from_markup("a < b <c>[] <d>");
        assert_eq!(parts(&tokens), vec![("a < b <c>[] <d>", None)]);

        let tokens = tokens_from_markup("x<y <漢>[かん]");
        assert_eq!(parts(&tokens), vec![("x<y ", None), ("漢", Some("かん"))]);
    }

    #[test]
    fn pairs_with_missing_readings() {
        let pairs = json!([["食", "た"], ["べる", null], ["", "x"], "bad", [5]]);
        let tokens = tokens_from_pairs(&pairs);
        assert_eq!(
            parts(&tokens),
            vec![("食", Some("た")), ("べる", None), ("5", None)]
        );
        assert!(tokens_from_pairs(&json!({"a": 1})).is_empty());
    }
}
