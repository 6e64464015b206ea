//! Segment auto-splitting.
//!
//! A segment whose rendered width overflows its slot is rewritten into
//! several narrower segments. Split points come from re-tokenizing the text
//! (words for space-separated text, characters otherwise), chunks are
//! filled greedily up to the slot width, and the original interval is
//! divided between the chunks in proportion to their content weight.
//!
//! Runs once per track before compositing.

mod timing;
mod tokenize;

pub use timing::{chunk_weight, partition};
pub use tokenize::{retokenize, split_words, trim_whitespace};

use serde::{Deserialize, Serialize};

use crate::models::{Segment, Slot, Token};
use crate::text::RubyRenderer;

/// Tunables for the auto-splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitOptions {
    /// Enable auto-splitting.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// A segment up to this multiple of the slot width is left alone
    /// (and downscaled later if needed).
    #[serde(default = "default_width_tolerance")]
    pub width_tolerance: f64,

    /// Timing weight of punctuation and symbols, relative to a letter.
    #[serde(default = "default_punctuation_weight")]
    pub punctuation_weight: f64,
}

fn default_true() -> bool {
    true
}

fn default_width_tolerance() -> f64 {
    1.05
}

fn default_punctuation_weight() -> f64 {
    0.2
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            width_tolerance: default_width_tolerance(),
            punctuation_weight: default_punctuation_weight(),
        }
    }
}

/// True if the tokens plus both render paddings fit the slot width.
pub fn fits_width(tokens: &[Token], slot_width: u32, renderer: &RubyRenderer) -> bool {
    let (width, _) = renderer.measure(tokens);
    width + renderer.style().effective_padding() * 2 <= slot_width
}

/// Greedily pack tokens into chunks that fit `slot_width`.
///
/// Chunks are trimmed of leading and trailing whitespace tokens; chunks that
/// end up empty are dropped. A single token wider than the slot forms its
/// own chunk.
pub fn chunk_to_width(tokens: &[Token], slot_width: u32, renderer: &RubyRenderer) -> Vec<Vec<Token>> {
    let mut chunks: Vec<Vec<Token>> = Vec::new();
    let mut current: Vec<Token> = Vec::new();

    let close = |chunk: &[Token], chunks: &mut Vec<Vec<Token>>| {
        let trimmed = trim_whitespace(chunk);
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_vec());
        }
    };

    for token in tokens {
        current.push(token.clone());
        if current.len() > 1 && !fits_width(&current, slot_width, renderer) {
            let overflow = current.pop();
            close(&current, &mut chunks);
            current.clear();
            current.extend(overflow);
        }
    }
    close(&current, &mut chunks);

    chunks
}

/// Split one segment to fit `slot`.
///
/// Returns the segment itself (same identity) when it already fits, when
/// splitting yields a single chunk, or when the chunks can't be given
/// valid intervals.
pub fn split_segment(
    segment: &Segment,
    slot: &Slot,
    renderer: &RubyRenderer,
    options: &SplitOptions,
) -> Vec<Segment> {
    let (width, height) = renderer.measure(segment.tokens());
    let width_limit = slot.width as f64 * options.width_tolerance;
    if height <= slot.height && width as f64 <= width_limit {
        return vec![segment.clone()];
    }

    let spaced = segment.text().chars().any(char::is_whitespace);
    let tokens = retokenize(segment.tokens(), spaced);
    let chunks = chunk_to_width(&tokens, slot.width, renderer);
    if chunks.len() <= 1 {
        return vec![segment.clone()];
    }

    let weights: Vec<f64> = chunks
        .iter()
        .map(|c| chunk_weight(c, options.punctuation_weight))
        .collect();
    let intervals = partition(segment.start(), segment.end(), &weights);

    let mut pieces = Vec::with_capacity(chunks.len());
    for (chunk, (start, end)) in chunks.into_iter().zip(intervals) {
        match Segment::new(start, end, chunk) {
            Some(piece) => pieces.push(piece),
            None => {
                tracing::warn!(
                    "[Split] Segment {} too short to split ({:.3}s), keeping it whole",
                    segment.id(),
                    segment.duration()
                );
                return vec![segment.clone()];
            }
        }
    }

    tracing::debug!(
        "[Split] Segment {} ({:.3}-{:.3}) split into {} parts for slot {}",
        segment.id(),
        segment.start(),
        segment.end(),
        pieces.len(),
        slot.id
    );

    pieces
}

/// Split every segment of a track to fit `slot`, preserving order.
pub fn split_for_slot(
    segments: &[Segment],
    slot: &Slot,
    renderer: &RubyRenderer,
    options: &SplitOptions,
) -> Vec<Segment> {
    if !options.enabled {
        return segments.to_vec();
    }

    let out: Vec<Segment> = segments
        .iter()
        .flat_map(|s| split_segment(s, slot, renderer, options))
        .collect();

    if out.len() != segments.len() {
        tracing::info!(
            "[Split] Slot {}: {} segments -> {} after auto-split",
            slot.id,
            segments.len(),
            out.len()
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::models::TextStyle;
    use crate::text::FontBook;

    fn renderer() -> RubyRenderer {
        RubyRenderer::new(TextStyle::default(), Arc::new(FontBook::builtin()))
    }

    fn letters(text: &str) -> Vec<Token> {
        text.chars().map(|c| Token::new(c.to_string())).collect()
    }

    /// Slot exactly wide enough for `n` single-letter tokens.
    fn slot_for(n: usize, renderer: &RubyRenderer) -> Slot {
        let sample = letters(&"A".repeat(n));
        let width = renderer.measure(&sample).0 + renderer.style().effective_padding() * 2;
        Slot::new(1, 0, 0, width, 200)
    }

    #[test]
    fn splits_long_line_into_equal_halves() {
        let r = renderer();
        let slot = slot_for(8, &r);
        let seg = Segment::new(0.0, 4.0, vec![Token::new("ABCDEFGHIJKLMNOP")]).unwrap();

        let parts = split_segment(&seg, &slot, &r, &SplitOptions::default());

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].text(), "ABCDEFGH");
        assert_eq!(parts[1].text(), "IJKLMNOP");
        assert_eq!((parts[0].start(), parts[0].end()), (0.0, 2.0));
        assert_eq!((parts[1].start(), parts[1].end()), (2.0, 4.0));
    }

    #[test]
    fn fitting_segment_is_returned_unchanged() {
        let r = renderer();
        let slot = slot_for(8, &r);
        let seg = Segment::new(1.0, 2.0, vec![Token::new("ABC")]).unwrap();

        let parts = split_segment(&seg, &slot, &r, &SplitOptions::default());
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].id(), seg.id());
    }

    #[test]
    fn slightly_wide_segment_is_tolerated() {
        let r = renderer();
        let seg = Segment::new(0.0, 1.0, vec![Token::new("ABCDEFGHIJ")]).unwrap();
        let width = r.measure(seg.tokens()).0;
        let slot = Slot::new(1, 0, 0, width - 2, 200);

        let parts = split_segment(&seg, &slot, &r, &SplitOptions::default());
        assert_eq!(parts[0].id(), seg.id());
    }

    #[test]
    fn chunks_respect_width_bound() {
        let r = renderer();
        let slot = slot_for(6, &r);
        let seg = Segment::new(0.0, 10.0, vec![Token::new("the quick brown fox jumps over it")])
            .unwrap();

        let parts = split_segment(&seg, &slot, &r, &SplitOptions::default());
        assert!(parts.len() > 1);
        for part in &parts {
            assert!(fits_width(part.tokens(), slot.width, &r), "{}", part.text());
            assert!(!part.text().starts_with(' ') && !part.text().ends_with(' '));
        }
        assert_eq!(parts.first().unwrap().start(), 0.0);
        assert_eq!(parts.last().unwrap().end(), 10.0);
        for pair in parts.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
    }

    #[test]
    fn word_tokens_are_never_cut() {
        let r = renderer();
        let slot = slot_for(16, &r);
        let words = ["hello", "there", "world", "again", "today"];
        let mut tokens = Vec::new();
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                tokens.push(Token::new(" "));
            }
            tokens.push(Token::new(*word));
        }
        let seg = Segment::new(0.0, 5.0, tokens).unwrap();

        let parts = split_segment(&seg, &slot, &r, &SplitOptions::default());
        assert!(parts.len() > 1);
        for part in &parts {
            for piece in part.text().split(' ') {
                assert!(words.contains(&piece), "chunk '{}' cuts a word", part.text());
            }
        }
        let joined: Vec<&str> = parts.iter().map(|p| p.text()).collect();
        assert_eq!(joined.join(" "), "hello there world again today");
    }

    #[test]
    fn oversized_atomic_token_gets_own_chunk() {
        let r = renderer();
        let slot = slot_for(4, &r);
        let seg = Segment::new(
            0.0,
            3.0,
            vec![
                Token::new("AB"),
                Token::with_ruby("日本語日本語", "にほんごにほんご"),
                Token::new("CD"),
            ],
        )
        .unwrap();

        let parts = split_segment(&seg, &slot, &r, &SplitOptions::default());
        let texts: Vec<&str> = parts.iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["AB", "日本語日本語", "CD"]);
        assert!(parts[1].tokens()[0].has_ruby());
    }

    #[test]
    fn disabled_options_leave_track_alone() {
        let r = renderer();
        let slot = slot_for(4, &r);
        let seg = Segment::new(0.0, 4.0, vec![Token::new("ABCDEFGHIJKLMNOP")]).unwrap();
        let options = SplitOptions {
            enabled: false,
            ..SplitOptions::default()
        };

        let out = split_for_slot(&[seg.clone()], &slot, &r, &options);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id(), seg.id());
    }

    #[test]
    fn punctuation_weight_shifts_boundary() {
        let r = renderer();
        let slot = slot_for(4, &r);
        let seg = Segment::new(0.0, 1.0, vec![Token::new("AAAA....")]).unwrap();

        let parts = split_segment(&seg, &slot, &r, &SplitOptions::default());
        assert_eq!(parts.len(), 2);
        // 4 letters vs 4 marks at 0.2 each
        assert!((parts[0].end() - 4.0 / 4.8).abs() < 1e-9);
    }
}
