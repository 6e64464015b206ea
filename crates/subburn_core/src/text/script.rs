//! Character classification by script.
//!
//! Ranges follow the Unicode blocks that matter for ruby layout: kana is
//! phonetic (never annotated on its own), kanji/hanzi is logographic.

/// Hiragana, katakana and the prolonged sound mark.
pub fn is_kana(ch: char) -> bool {
    matches!(ch, '\u{3040}'..='\u{30FF}')
}

/// Katakana block, including the prolonged sound mark.
pub fn is_katakana(ch: char) -> bool {
    matches!(ch, '\u{30A0}'..='\u{30FF}')
}

/// CJK unified ideographs (plus extension A, compatibility ideographs and
/// the iteration mark).
pub fn is_kanji(ch: char) -> bool {
    matches!(
        ch,
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}' | '\u{3005}'
    )
}

pub fn is_hangul(ch: char) -> bool {
    matches!(ch, '\u{AC00}'..='\u{D7A3}')
}

pub fn is_arabic(ch: char) -> bool {
    matches!(ch, '\u{0600}'..='\u{06FF}')
}

/// Characters that occupy a full em in East Asian typesetting.
pub fn is_wide(ch: char) -> bool {
    is_kana(ch)
        || is_kanji(ch)
        || is_hangul(ch)
        || matches!(ch, '\u{3000}'..='\u{303F}' | '\u{FF01}'..='\u{FF60}')
}

pub fn has_kanji(text: &str) -> bool {
    text.chars().any(is_kanji)
}

/// Kana present and no kanji.
pub fn is_kana_text(text: &str) -> bool {
    text.chars().any(is_kana) && !has_kanji(text)
}

/// Timing weight of one character.
///
/// Letters, digits and every script's word characters count fully,
/// whitespace not at all, and everything else (punctuation, symbols)
/// counts `punctuation_weight`.
pub fn char_weight(ch: char, punctuation_weight: f64) -> f64 {
    if ch.is_whitespace() {
        0.0
    } else if ch.is_alphanumeric() || is_kanji(ch) || is_kana(ch) || is_hangul(ch) || is_arabic(ch)
    {
        1.0
    } else {
        punctuation_weight
    }
}

/// Sum of `char_weight` over a string.
pub fn text_weight(text: &str, punctuation_weight: f64) -> f64 {
    text.chars().map(|c| char_weight(c, punctuation_weight)).sum()
}

/// Convert katakana to hiragana, leaving everything else untouched.
pub fn to_hiragana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Split a word into leading kana, logographic core and trailing kana.
///
/// Only words containing kanji are split; anything else is returned as the
/// core with empty affixes.
pub fn split_kana_affixes(text: &str) -> (&str, &str, &str) {
    if !has_kanji(text) {
        return ("", text, "");
    }

    let prefix_end = text
        .char_indices()
        .find(|(_, c)| !is_kana(*c))
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    let suffix_start = text
        .char_indices()
        .rev()
        .find(|(_, c)| !is_kana(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);

    (
        &text[..prefix_end],
        &text[prefix_end..suffix_start],
        &text[suffix_start..],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_scripts() {
        assert!(is_kana('あ'));
        assert!(is_kana('カ'));
        assert!(is_katakana('カ') && is_katakana('ー'));
        assert!(!is_katakana('あ'));
        assert!(is_kana('ー'));
        assert!(!is_kana('食'));
        assert!(is_kanji('食'));
        assert!(is_hangul('한'));
        assert!(is_arabic('ع'));
        assert!(is_wide('。'));
        assert!(!is_wide('A'));
    }

    #[test]
    fn weights() {
        assert_eq!(char_weight('a', 0.2), 1.0);
        assert_eq!(char_weight('7', 0.2), 1.0);
        assert_eq!(char_weight('食', 0.2), 1.0);
        assert_eq!(char_weight(' ', 0.2), 0.0);
        assert_eq!(char_weight(',', 0.2), 0.2);
        assert!((text_weight("Hi, you", 0.2) - 5.2).abs() < 1e-9);
    }

    #[test]
    fn kana_affixes() {
        assert_eq!(split_kana_affixes("食べた"), ("", "食", "べた"));
        assert_eq!(split_kana_affixes("お茶"), ("お", "茶", ""));
        assert_eq!(split_kana_affixes("お見舞い"), ("お", "見舞", "い"));
        assert_eq!(split_kana_affixes("日本"), ("", "日本", ""));
        assert_eq!(split_kana_affixes("たべた"), ("", "たべた", ""));
    }

    #[test]
    fn hiragana_conversion() {
        assert_eq!(to_hiragana("カタカナ"), "かたかな");
        assert_eq!(to_hiragana("ラーメン"), "らーめん");
        assert!(is_kana_text("すし"));
        assert!(!is_kana_text("寿司"));
    }
}
