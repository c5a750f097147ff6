use crate::fuzzy::char_similarity;
use crate::index::CorpusIndex;
use crate::model::{Decision, RetrievalMatch};
use crate::normalize::Normalizer;
use crate::tfidf::cosine_similarity;
use rayon::prelude::*;
use tracing::debug;

pub const VECTOR_WEIGHT: f32 = 0.7;
pub const CHAR_WEIGHT: f32 = 0.3;

pub fn combined_score(vector_similarity: f32, char_similarity: f32) -> f32 {
    VECTOR_WEIGHT * vector_similarity + CHAR_WEIGHT * char_similarity
}

/// Combined score of `normalized` against every corpus question, in corpus order.
pub fn score_all(normalized: &str, index: &CorpusIndex) -> Vec<f32> {
    let Some(query) = index.query_vector(normalized) else {
        return Vec::new();
    };

    index
        .records()
        .par_iter()
        .zip(index.vectors().par_iter())
        .map(|(record, vector)| {
            combined_score(
                cosine_similarity(&query, vector),
                char_similarity(normalized, &record.text),
            )
        })
        .collect()
}

/// Highest score and its position; ties go to the earliest candidate.
pub fn top_match(scores: &[f32]) -> Option<(usize, f32)> {
    scores.iter().copied().enumerate().fold(None, |best, (i, s)| match best {
        Some((_, b)) if s <= b => best,
        _ => Some((i, s)),
    })
}

/// Score a raw question against the index and apply `threshold`.
///
/// A miss still reports the best combined score seen.
pub fn decide(
    question: &str,
    index: &CorpusIndex,
    normalizer: &Normalizer,
    threshold: f32,
) -> RetrievalMatch {
    let normalized = normalizer.normalize(question);
    if normalized.is_empty() || index.is_empty() {
        return RetrievalMatch::miss(0.0);
    }

    let scores = score_all(&normalized, index);
    match top_match(&scores) {
        Some((best, score)) if score >= threshold => {
            debug!(score, threshold, "similarity hit");
            RetrievalMatch {
                entry: Some(index.records()[best].entry),
                score,
                decision: Decision::Hit,
            }
        }
        Some((_, score)) => {
            debug!(score, threshold, "similarity below threshold");
            RetrievalMatch::miss(score)
        }
        None => RetrievalMatch::miss(0.0),
    }
}
