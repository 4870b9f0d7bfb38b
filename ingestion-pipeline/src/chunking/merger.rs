//! Greedy semantic merging of raw fragments into final chunks.

use common::error::AppError;
use tracing::debug;

use crate::types::{Chunk, RawFragment};

use super::classifier::SameUnitClassifier;
use super::token_count::CountTokens;

/// Folds the ordered fragment sequence of one document into chunks. The
/// running accumulator is flushed whenever the classifier reports a
/// semantic break, or when accepting a merge would push the accumulator
/// past the token ceiling. The ceiling always wins over continuity: a
/// continuous passage is split rather than ever emitting an oversized
/// chunk. A ceiling-rejected fragment starts a fresh accumulator.
pub struct SemanticMerger<'a> {
    classifier: &'a dyn SameUnitClassifier,
    counter: &'a dyn CountTokens,
    max_tokens: usize,
}

impl std::fmt::Debug for SemanticMerger<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticMerger")
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl<'a> SemanticMerger<'a> {
    pub fn new(
        classifier: &'a dyn SameUnitClassifier,
        counter: &'a dyn CountTokens,
        max_tokens: usize,
    ) -> Result<Self, AppError> {
        if max_tokens == 0 {
            return Err(AppError::Validation(
                "token ceiling must be positive".to_string(),
            ));
        }
        Ok(Self {
            classifier,
            counter,
            max_tokens,
        })
    }

    /// Merges the fragments of a single document. Fragment order is the
    /// chunk order; content is never reordered. Any classifier or counter
    /// failure aborts the whole document, discarding in-progress chunks.
    pub async fn merge(&self, fragments: Vec<RawFragment>) -> Result<Vec<Chunk>, AppError> {
        let mut iter = fragments.into_iter();
        let Some(mut premise) = iter.next() else {
            return Ok(Vec::new());
        };

        let mut chunks: Vec<Chunk> = Vec::new();
        for hypothesis in iter {
            if self
                .classifier
                .judge(&premise.text, &hypothesis.text)
                .await?
            {
                let candidate = format!("{} {}", premise.text, hypothesis.text);
                if self.counter.count(&candidate)? > self.max_tokens {
                    debug!(
                        source = %premise.source,
                        "token ceiling reached; splitting continuous passage"
                    );
                    flush(&mut chunks, premise);
                    premise = hypothesis;
                } else {
                    // Metadata stays with the accumulator's origin.
                    premise.text = candidate;
                }
            } else {
                flush(&mut chunks, premise);
                premise = hypothesis;
            }
        }

        flush(&mut chunks, premise);
        Ok(chunks)
    }
}

fn flush(chunks: &mut Vec<Chunk>, premise: RawFragment) {
    let chunk_index = chunks.len();
    chunks.push(Chunk {
        text: premise.text,
        source: premise.source,
        category: premise.category,
        chunk_index,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a fixed sequence of judgments and records the pairs asked.
    struct ScriptedClassifier {
        judgments: Mutex<Vec<bool>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedClassifier {
        fn new(judgments: Vec<bool>) -> Self {
            Self {
                judgments: Mutex::new(judgments),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().expect("lock").len()
        }
    }

    #[async_trait]
    impl SameUnitClassifier for ScriptedClassifier {
        async fn judge(&self, premise: &str, hypothesis: &str) -> Result<bool, AppError> {
            self.calls
                .lock()
                .expect("lock")
                .push((premise.to_string(), hypothesis.to_string()));
            let mut judgments = self.judgments.lock().expect("lock");
            if judgments.is_empty() {
                return Err(AppError::Classifier("unexpected judge call".to_string()));
            }
            Ok(judgments.remove(0))
        }
    }

    /// Counts whitespace-separated words as tokens.
    struct WordCounter;

    impl CountTokens for WordCounter {
        fn count(&self, text: &str) -> Result<usize, AppError> {
            Ok(text.split_whitespace().count())
        }
    }

    /// Fails on first use; verifies the merger never consulted it.
    struct UntouchedCounter;

    impl CountTokens for UntouchedCounter {
        fn count(&self, _text: &str) -> Result<usize, AppError> {
            Err(AppError::Tokenizer("counter must not be called".to_string()))
        }
    }

    fn fragment(text: &str) -> RawFragment {
        RawFragment::new(text.to_string(), "doc.pdf", "water", 0)
    }

    #[tokio::test]
    async fn test_empty_input_yields_no_chunks() {
        let classifier = ScriptedClassifier::new(Vec::new());
        let merger = SemanticMerger::new(&classifier, &UntouchedCounter, 500).expect("valid");
        let chunks = merger.merge(Vec::new()).await.expect("merge");
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_single_fragment_passes_through_untouched() {
        let classifier = ScriptedClassifier::new(Vec::new());
        let merger = SemanticMerger::new(&classifier, &UntouchedCounter, 500).expect("valid");
        let chunks = merger
            .merge(vec![fragment("единственный фрагмент")])
            .await
            .expect("merge");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "единственный фрагмент");
        assert_eq!(chunks[0].chunk_index, 0);
        // Neither model was consulted for a lone fragment.
        assert_eq!(classifier.call_count(), 0);
    }

    #[tokio::test]
    async fn test_different_units_stay_separate() {
        let classifier = ScriptedClassifier::new(vec![false]);
        let merger = SemanticMerger::new(&classifier, &WordCounter, 500).expect("valid");
        let chunks = merger
            .merge(vec![
                fragment("Вода должна быть прозрачной."),
                fragment("Цвет не нормируется."),
            ])
            .await
            .expect("merge");

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "Вода должна быть прозрачной.");
        assert_eq!(chunks[1].text, "Цвет не нормируется.");
    }

    #[tokio::test]
    async fn test_same_unit_merges_with_single_space() {
        let classifier = ScriptedClassifier::new(vec![true]);
        let merger = SemanticMerger::new(&classifier, &WordCounter, 500).expect("valid");
        let chunks = merger
            .merge(vec![
                fragment("Концентрация"),
                fragment("раствора равна 5%."),
            ])
            .await
            .expect("merge");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Концентрация раствора равна 5%.");
    }

    #[tokio::test]
    async fn test_ceiling_splits_continuous_passage() {
        let classifier = ScriptedClassifier::new(vec![true]);
        // Candidate has 5 words; ceiling of 4 rejects the merge.
        let merger = SemanticMerger::new(&classifier, &WordCounter, 4).expect("valid");
        let chunks = merger
            .merge(vec![
                fragment("один два три"),
                fragment("четыре пять"),
            ])
            .await
            .expect("merge");

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "один два три");
        assert_eq!(chunks[1].text, "четыре пять");
    }

    #[tokio::test]
    async fn test_rejected_tail_starts_fresh_accumulator() {
        // Three fragments, all continuous; ceiling rejects the first merge
        // but admits the second (fresh accumulator plus next neighbour).
        let classifier = ScriptedClassifier::new(vec![true, true]);
        let merger = SemanticMerger::new(&classifier, &WordCounter, 4).expect("valid");
        let chunks = merger
            .merge(vec![
                fragment("один два три"),
                fragment("четыре пять"),
                fragment("шесть"),
            ])
            .await
            .expect("merge");

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].text, "четыре пять шесть");
    }

    #[tokio::test]
    async fn test_chunk_indices_strictly_increase() {
        let classifier = ScriptedClassifier::new(vec![false, false, false]);
        let merger = SemanticMerger::new(&classifier, &WordCounter, 500).expect("valid");
        let chunks = merger
            .merge(vec![
                fragment("а"),
                fragment("б"),
                fragment("в"),
                fragment("г"),
            ])
            .await
            .expect("merge");

        let indices: Vec<usize> = chunks.iter().map(|c| c.chunk_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_merged_chunk_keeps_premise_metadata() {
        let classifier = ScriptedClassifier::new(vec![true]);
        let merger = SemanticMerger::new(&classifier, &WordCounter, 500).expect("valid");
        let mut first = fragment("начало");
        first.offset = 0;
        let mut second = RawFragment::new("конец".to_string(), "doc.pdf", "water", 462);
        second.offset = 462;
        let chunks = merger
            .merge(vec![first, second])
            .await
            .expect("merge");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source, "doc.pdf");
        assert_eq!(chunks[0].category, "water");
    }

    #[tokio::test]
    async fn test_classifier_failure_aborts_document() {
        // Script exhausted on the second pair -> hard error, no chunks.
        let classifier = ScriptedClassifier::new(vec![false]);
        let merger = SemanticMerger::new(&classifier, &WordCounter, 500).expect("valid");
        let err = merger
            .merge(vec![fragment("а"), fragment("б"), fragment("в")])
            .await
            .expect_err("classifier failure propagates");
        assert!(matches!(err, AppError::Classifier(_)));
    }

    #[tokio::test]
    async fn test_no_chunk_ever_exceeds_ceiling() {
        let classifier = ScriptedClassifier::new(vec![true, true, true, true]);
        let merger = SemanticMerger::new(&classifier, &WordCounter, 3).expect("valid");
        let chunks = merger
            .merge(vec![
                fragment("раз два"),
                fragment("три"),
                fragment("четыре"),
                fragment("пять шесть"),
                fragment("семь"),
            ])
            .await
            .expect("merge");

        let counter = WordCounter;
        for chunk in &chunks {
            assert!(counter.count(&chunk.text).expect("count") <= 3);
            assert!(!chunk.text.trim().is_empty());
        }
    }

    #[tokio::test]
    async fn test_zero_ceiling_rejected_at_construction() {
        let classifier = ScriptedClassifier::new(Vec::new());
        let err = SemanticMerger::new(&classifier, &WordCounter, 0).expect_err("invalid ceiling");
        assert!(matches!(err, AppError::Validation(_)));
    }
}
