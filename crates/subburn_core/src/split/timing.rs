//! Proportional redistribution of a segment's interval over its chunks.

use crate::models::Token;
use crate::text::script::text_weight;

/// Content weight of a chunk. Icons count as one full character.
pub fn chunk_weight(tokens: &[Token], punctuation_weight: f64) -> f64 {
    tokens
        .iter()
        .map(|t| {
            if t.is_icon() {
                1.0
            } else {
                text_weight(t.text(), punctuation_weight)
            }
        })
        .sum()
}

/// Partition `[start, end]` into consecutive intervals proportional to `weights`.
///
/// Adjacent intervals share their boundary value exactly, the first starts
/// at `start` and the last ends at `end`. If the weights don't sum to a
/// positive total, or any chunk weighs nothing, every chunk gets an equal
/// share instead.
pub fn partition(start: f64, end: f64, weights: &[f64]) -> Vec<(f64, f64)> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }

    let total: f64 = weights.iter().sum();
    let usable = total > 0.0 && weights.iter().all(|w| *w > 0.0 && w.is_finite());
    let weights: Vec<f64> = if usable {
        weights.to_vec()
    } else {
        vec![1.0; n]
    };
    let total: f64 = weights.iter().sum();

    let duration = end - start;
    let mut bounds = Vec::with_capacity(n + 1);
    bounds.push(start);
    let mut cumulative = 0.0;
    for w in &weights[..n - 1] {
        cumulative += w;
        bounds.push(start + duration * (cumulative / total));
    }
    bounds.push(end);

    bounds.windows(2).map(|b| (b[0], b[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tiles(parts: &[(f64, f64)], start: f64, end: f64) {
        assert_eq!(parts.first().map(|p| p.0), Some(start));
        assert_eq!(parts.last().map(|p| p.1), Some(end));
        for pair in parts.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn proportional_split() {
        let parts = partition(0.0, 4.0, &[8.0, 8.0]);
        assert_eq!(parts, vec![(0.0, 2.0), (2.0, 4.0)]);

        let parts = partition(10.0, 13.0, &[1.0, 2.0]);
        assert!((parts[0].1 - 11.0).abs() < 1e-9);
        assert_tiles(&parts, 10.0, 13.0);
    }

    #[test]
    fn zero_weights_fall_back_to_equal() {
        let parts = partition(0.0, 3.0, &[0.0, 0.0, 0.0]);
        assert!((parts[0].1 - 1.0).abs() < 1e-9);
        assert!((parts[1].1 - 2.0).abs() < 1e-9);
        assert_tiles(&parts, 0.0, 3.0);

        let parts = partition(0.0, 2.0, &[3.0, 0.0]);
        assert!((parts[0].1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn awkward_values_still_tile_exactly() {
        let weights = [1.2, 3.0, 0.2, 7.4, 1.0, 2.6];
        let parts = partition(1.1, 7.3, &weights);
        assert_eq!(parts.len(), weights.len());
        assert_tiles(&parts, 1.1, 7.3);
        assert!(parts.iter().all(|(s, e)| s < e));
    }

    #[test]
    fn chunk_weights() {
        let tokens = vec![Token::new("Hi"), Token::new(","), Token::new(" ")];
        assert!((chunk_weight(&tokens, 0.2) - 2.2).abs() < 1e-9);
        assert!((chunk_weight(&tokens, 0.5) - 2.5).abs() < 1e-9);
    }
}
