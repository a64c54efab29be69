// ============================================================
// Layer 5 — Answer Span Decoding
// ============================================================
// Given per-token start and end probabilities, pick the span
// (s, e) that maximises p_start[s] * p_end[e], subject to:
//   - both ends inside the context segment
//   - s <= e
//   - e - s + 1 <= max_len
//
// Kept free of Burn types so it can be tested on plain slices.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanChoice {
    /// First token index (inclusive), in full-sequence coordinates
    pub start: usize,
    /// Last token index (inclusive)
    pub end:   usize,
    pub score: f32,
}

/// Best span inside `window`. Returns None for an empty window
/// or when max_len is zero. Ties keep the earliest span.
pub fn best_span(
    start_probs: &[f32],
    end_probs:   &[f32],
    window:      Range<usize>,
    max_len:     usize,
) -> Option<SpanChoice> {
    let limit = window.end.min(start_probs.len()).min(end_probs.len());
    let mut best: Option<SpanChoice> = None;

    for s in window.start..limit {
        for e in s..s.saturating_add(max_len).min(limit) {
            let score = start_probs[s] * end_probs[e];
            if best.map_or(true, |b| score > b.score) {
                best = Some(SpanChoice { start: s, end: e, score });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_max_product() {
        //            0    1    2    3    4
        let start = [0.0, 0.1, 0.7, 0.1, 0.1];
        let end   = [0.0, 0.1, 0.1, 0.6, 0.2];
        let span  = best_span(&start, &end, 1..5, 30).unwrap();
        assert_eq!((span.start, span.end), (2, 3));
        assert!((span.score - 0.42).abs() < 1e-6);
    }

    #[test]
    fn test_end_never_before_start() {
        let start = [0.0, 0.1, 0.1, 0.8];
        let end   = [0.0, 0.9, 0.05, 0.05];
        let span  = best_span(&start, &end, 1..4, 30).unwrap();
        assert!(span.start <= span.end);
        // (1,1) = 0.09 beats (3,3) = 0.04
        assert_eq!((span.start, span.end), (1, 1));
    }

    #[test]
    fn test_ignores_tokens_outside_window() {
        // Highest probabilities sit on the question tokens (0..2)
        let start = [0.9, 0.9, 0.2, 0.3];
        let end   = [0.9, 0.9, 0.3, 0.2];
        let span  = best_span(&start, &end, 2..4, 30).unwrap();
        assert!(span.start >= 2 && span.end < 4);
    }

    #[test]
    fn test_respects_max_len() {
        let start = [0.9, 0.0, 0.0, 0.0, 0.1];
        let end   = [0.0, 0.0, 0.0, 0.0, 0.9];
        let span  = best_span(&start, &end, 0..5, 2).unwrap();
        assert!(span.end - span.start + 1 <= 2);
    }

    #[test]
    fn test_empty_window() {
        assert!(best_span(&[0.5], &[0.5], 1..1, 30).is_none());
        assert!(best_span(&[0.5], &[0.5], 0..1, 0).is_none());
    }

    #[test]
    fn test_unbounded_max_len() {
        let span = best_span(&[0.1, 0.9], &[0.2, 0.8], 0..2, usize::MAX).unwrap();
        assert_eq!((span.start, span.end), (1, 1));
    }
}
