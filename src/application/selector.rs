// ============================================================
// Layer 2 — Answer Selector
// ============================================================
// Scans every (page, paragraph) passage in document order,
// scores it, and keeps the single best candidate.
//
//   for page in document:              (page order)
//     for passage in split(page):      (paragraph order)
//       score → Err  : warn, skip
//       score < t    : discard
//       score > best : replace best    (strict, so ties keep
//                                       the earlier passage)
//
// Passages below the threshold never compete, even when no
// other passage clears it; the result is then NoAnswer.

use crate::data::splitter::passages;
use crate::domain::answer::{Candidate, PageNumbering, PassageLocation, QueryResult};
use crate::domain::document::Document;
use crate::domain::traits::AnswerScorer;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionSettings {
    /// Candidates scoring below this are discarded
    pub threshold: f64,
    pub numbering: PageNumbering,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            numbering: PageNumbering::Sequential,
        }
    }
}

/// Counters for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub pages:           usize,
    pub passages:        usize,
    pub failed:          usize,
    pub below_threshold: usize,
}

pub fn select_answer<S>(
    question: &str,
    document: &Document,
    scorer:   &S,
    settings: SelectionSettings,
) -> QueryResult
where
    S: AnswerScorer + ?Sized,
{
    select_answer_with_stats(question, document, scorer, settings).0
}

pub fn select_answer_with_stats<S>(
    question: &str,
    document: &Document,
    scorer:   &S,
    settings: SelectionSettings,
) -> (QueryResult, ScanStats)
where
    S: AnswerScorer + ?Sized,
{
    let mut best: Option<Candidate> = None;
    let mut best_score = f64::NEG_INFINITY;
    let mut stats = ScanStats::default();

    for page in document.pages() {
        let page_no = settings.numbering.number_of(page);
        tracing::info!("Processing page {}", page_no);
        stats.pages += 1;

        for (paragraph_no, text) in passages(page) {
            stats.passages += 1;

            let scored = match scorer.score(question, text) {
                Ok(scored) => scored,
                Err(e) => {
                    tracing::warn!(
                        "Error processing paragraph {} on page {}: {}",
                        paragraph_no, page_no, e
                    );
                    stats.failed += 1;
                    continue;
                }
            };

            tracing::debug!(
                "Page {} paragraph {}: '{}' ({:.4})",
                page_no, paragraph_no, scored.answer, scored.score
            );

            // NaN fails both comparisons below, so it can never win either
            if scored.score < settings.threshold {
                stats.below_threshold += 1;
                continue;
            }

            if scored.score > best_score {
                best_score = scored.score;
                best = Some(Candidate {
                    location: PassageLocation { page: page_no, paragraph: paragraph_no },
                    answer:   scored.answer,
                    score:    scored.score,
                });
            }
        }
    }

    tracing::info!(
        "Scanned {} passages on {} pages ({} failed, {} below threshold {:.2})",
        stats.passages, stats.pages, stats.failed, stats.below_threshold, settings.threshold
    );

    let result = match best {
        Some(candidate) => QueryResult::Answer(candidate),
        None            => QueryResult::NoAnswer,
    };
    (result, stats)
}
