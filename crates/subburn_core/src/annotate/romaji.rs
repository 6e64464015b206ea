//! Kana to Hepburn romaji.

use crate::text::script::to_hiragana;

/// Romaji for a single hiragana character.
fn base(ch: char) -> Option<&'static str> {
    let r = match ch {
        'あ' => "a",
        'い' => "i",
        'う' => "u",
        'え' => "e",
        'お' => "o",
        'か' => "ka",
        'き' => "ki",
        'く' => "ku",
        'け' => "ke",
        'こ' => "ko",
        'さ' => "sa",
        'し' => "shi",
        'す' => "su",
        'せ' => "se",
        'そ' => "so",
        'た' => "ta",
        'ち' => "chi",
        'つ' => "tsu",
        'て' => "te",
        'と' => "to",
        'な' => "na",
        'に' => "ni",
        'ぬ' => "nu",
        'ね' => "ne",
        'の' => "no",
        'は' => "ha",
        'ひ' => "hi",
        'ふ' => "fu",
        'へ' => "he",
        'ほ' => "ho",
        'ま' => "ma",
        'み' => "mi",
        'む' => "mu",
        'め' => "me",
        'も' => "mo",
        'や' => "ya",
        'ゆ' => "yu",
        'よ' => "yo",
        'ら' => "ra",
        'り' => "ri",
        'る' => "ru",
        'れ' => "re",
        'ろ' => "ro",
        'わ' => "wa",
        'ゐ' => "i",
        'ゑ' => "e",
        'を' => "o",
        'ん' => "n",
        'が' => "ga",
        'ぎ' => "gi",
        'ぐ' => "gu",
        'げ' => "ge",
        'ご' => "go",
        'ざ' => "za",
        'じ' => "ji",
        'ず' => "zu",
        'ぜ' => "ze",
        'ぞ' => "zo",
        'だ' => "da",
        'ぢ' => "ji",
        'づ' => "zu",
        'で' => "de",
        'ど' => "do",
        'ば' => "ba",
        'び' => "bi",
        'ぶ' => "bu",
        'べ' => "be",
        'ぼ' => "bo",
        'ぱ' => "pa",
        'ぴ' => "pi",
        'ぷ' => "pu",
        'ぺ' => "pe",
        'ぽ' => "po",
        'ゔ' => "vu",
        'ぁ' => "a",
        'ぃ' => "i",
        'ぅ' => "u",
        'ぇ' => "e",
        'ぉ' => "o",
        'ゃ' => "ya",
        'ゅ' => "yu",
        'ょ' => "yo",
        'ゎ' => "wa",
        _ => return None,
    };
    Some(r)
}

/// Romaji for a kana followed by a small kana.
fn digraph(first: char, second: char) -> Option<&'static str> {
    let r = match (first, second) {
        ('き', 'ゃ') => "kya",
        ('き', 'ゅ') => "kyu",
        ('き', 'ょ') => "kyo",
        ('ぎ', 'ゃ') => "gya",
        ('ぎ', 'ゅ') => "gyu",
        ('ぎ', 'ょ') => "gyo",
        ('し', 'ゃ') => "sha",
        ('し', 'ゅ') => "shu",
        ('し', 'ぇ') => "she",
        ('し', 'ょ') => "sho",
        ('じ', 'ゃ') => "ja",
        ('じ', 'ゅ') => "ju",
        ('じ', 'ぇ') => "je",
        ('じ', 'ょ') => "jo",
        ('ち', 'ゃ') => "cha",
        ('ち', 'ゅ') => "chu",
        ('ち', 'ぇ') => "che",
        ('ち', 'ょ') => "cho",
        ('に', 'ゃ') => "nya",
        ('に', 'ゅ') => "nyu",
        ('に', 'ょ') => "nyo",
        ('ひ', 'ゃ') => "hya",
        ('ひ', 'ゅ') => "hyu",
        ('ひ', 'ょ') => "hyo",
        ('み', 'ゃ') => "mya",
        ('み', 'ゅ') => "myu",
        ('み', 'ょ') => "myo",
        ('り', 'ゃ') => "rya",
        ('り', 'ゅ') => "ryu",
        ('り', 'ょ') => "ryo",
        ('び', 'ゃ') => "bya",
        ('び', 'ゅ') => "byu",
        ('び', 'ょ') => "byo",
        ('ぴ', 'ゃ') => "pya",
        ('ぴ', 'ゅ') => "pyu",
        ('ぴ', 'ょ') => "pyo",
        ('ふ', 'ぁ') => "fa",
        ('ふ', 'ぃ') => "fi",
        ('ふ', 'ぇ') => "fe",
        ('ふ', 'ぉ') => "fo",
        ('て', 'ぃ') => "ti",
        ('で', 'ぃ') => "di",
        ('ゔ', 'ぁ') => "va",
        ('ゔ', 'ぃ') => "vi",
        ('ゔ', 'ぇ') => "ve",
        ('ゔ', 'ぉ') => "vo",
        ('ゔ', 'ゅ') => "vyu",
        _ => return None,
    };
    Some(r)
}

/// Romanize a kana string.
///
/// Katakana is read as hiragana. A small っ doubles the next consonant
/// (`tch` before `ch`), ー repeats the previous vowel, and characters
/// without a reading pass through unchanged. Returns None when the result
/// is empty.
pub fn kana_to_romaji(text: &str) -> Option<String> {
    let chars: Vec<char> = to_hiragana(text).chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == 'っ' {
            let next = chars
                .get(i + 1)
                .and_then(|&n| {
                    chars
                        .get(i + 2)
                        .and_then(|&m| digraph(n, m))
                        .or_else(|| base(n))
                });
            if let Some(next) = next {
                if next.starts_with("ch") {
                    out.push('t');
                } else if let Some(c) = next.chars().next().filter(|c| !"aeiou".contains(*c)) {
                    out.push(c);
                }
            }
            i += 1;
            continue;
        }

        if ch == 'ー' {
            if let Some(last) = out.chars().last().filter(|c| "aeiou".contains(*c)) {
                out.push(last);
            }
            i += 1;
            continue;
        }

        if let Some(r) = chars.get(i + 1).and_then(|&next| digraph(ch, next)) {
            out.push_str(r);
            i += 2;
            continue;
        }

        match base(ch) {
            Some(r) => out.push_str(r),
            None => out.push(ch),
        }
        i += 1;
    }

    let trimmed = out.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Romaji for one kana character; None for ー and unknown characters.
pub fn kana_char_romaji(ch: char) -> Option<String> {
    if ch == 'ー' {
        return None;
    }
    let hira = to_hiragana(&ch.to_string());
    let first = hira.chars().next()?;
    base(first).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_kana() {
        assert_eq!(kana_to_romaji("すし").as_deref(), Some("sushi"));
        assert_eq!(kana_to_romaji("ありがとう").as_deref(), Some("arigatou"));
        assert_eq!(kana_to_romaji("カタカナ").as_deref(), Some("katakana"));
    }

    #[test]
    fn digraphs() {
        assert_eq!(kana_to_romaji("きょう").as_deref(), Some("kyou"));
        assert_eq!(kana_to_romaji("しゃしん").as_deref(), Some("shashin"));
        assert_eq!(kana_to_romaji("ファン").as_deref(), Some("fan"));
    }

    #[test]
    fn gemination() {
        assert_eq!(kana_to_romaji("きって").as_deref(), Some("kitte"));
        assert_eq!(kana_to_romaji("まっちゃ").as_deref(), Some("matcha"));
        assert_eq!(kana_to_romaji("いっしょ").as_deref(), Some("issho"));
        // Trailing small tsu has nothing to double
        assert_eq!(kana_to_romaji("あっ").as_deref(), Some("a"));
    }

    #[test]
    fn long_vowel_mark() {
        assert_eq!(kana_to_romaji("ラーメン").as_deref(), Some("raamen"));
        assert_eq!(kana_to_romaji("ー"), None);
    }

    #[test]
    fn unknown_characters_pass_through() {
        assert_eq!(kana_to_romaji("ね!").as_deref(), Some("ne!"));
        assert_eq!(kana_to_romaji(""), None);
    }

    #[test]
    fn single_characters() {
        assert_eq!(kana_char_romaji('カ').as_deref(), Some("ka"));
        assert_eq!(kana_char_romaji('を').as_deref(), Some("o"));
        assert_eq!(kana_char_romaji('ー'), None);
        assert_eq!(kana_char_romaji('A'), None);
    }
}
