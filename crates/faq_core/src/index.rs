use crate::model::Dataset;
use crate::normalize::Normalizer;
use crate::tfidf::{SparseVector, TfidfVectorizer};
use tracing::{debug, info};

/// One normalized paraphrase and the position of its owning entry in the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub text: String,
    pub entry: usize,
}

#[derive(Debug, Clone)]
struct VectorSpace {
    vectorizer: TfidfVectorizer,
    vectors: Vec<SparseVector>,
}

/// Normalized corpus questions plus their TF-IDF vectors, fit on this corpus only.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    records: Vec<QuestionRecord>,
    space: Option<VectorSpace>,
}

impl CorpusIndex {
    pub fn build(dataset: &Dataset, normalizer: &Normalizer) -> Self {
        let mut records = Vec::with_capacity(dataset.question_count());
        for (entry, faq) in dataset.entries.iter().enumerate() {
            for question in &faq.questions {
                let text = normalizer.normalize(question);
                if text.is_empty() {
                    debug!(id = %faq.id, question = %question, "question normalizes to nothing; skipped");
                    continue;
                }
                records.push(QuestionRecord { text, entry });
            }
        }

        let docs: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
        let space = TfidfVectorizer::fit_transform(&docs)
            .map(|(vectorizer, vectors)| VectorSpace { vectorizer, vectors });

        info!(
            dataset = %dataset.name,
            questions = records.len(),
            vocabulary = space.as_ref().map_or(0, |s| s.vectorizer.vocabulary_len()),
            "corpus index built"
        );

        Self { records, space }
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() || self.space.is_none()
    }

    /// Vector for a normalized query, or `None` when the index has no vector space.
    pub fn query_vector(&self, normalized: &str) -> Option<SparseVector> {
        self.space.as_ref().map(|s| s.vectorizer.transform(normalized))
    }

    /// Corpus vectors aligned with [`CorpusIndex::records`].
    pub fn vectors(&self) -> &[SparseVector] {
        self.space.as_ref().map_or(&[][..], |s| s.vectors.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FaqEntry, FaqId};

    fn entry(id: i64, questions: &[&str]) -> FaqEntry {
        FaqEntry {
            id: FaqId::Num(id),
            category: "umum".to_string(),
            questions: questions.iter().map(|q| q.to_string()).collect(),
            answer: format!("answer-{id}"),
            keywords: Vec::new(),
            links: Vec::new(),
        }
    }

    #[test]
    fn keeps_one_record_per_paraphrase_in_order() {
        let ds = Dataset::new(
            "t",
            vec![
                entry(1, &["Apa itu stunting?", "apa itu stunting"]),
                entry(2, &["Cara mencegah stunting"]),
            ],
        );
        let idx = CorpusIndex::build(&ds, &Normalizer::indonesian());
        let owners: Vec<usize> = idx.records().iter().map(|r| r.entry).collect();
        assert_eq!(owners, vec![0, 0, 1]);
        assert_eq!(idx.records()[0].text, idx.records()[1].text);
        assert_eq!(idx.vectors().len(), 3);
        assert!(!idx.is_empty());
    }

    #[test]
    fn drops_questions_that_normalize_to_nothing() {
        let ds = Dataset::new("t", vec![entry(1, &["?!", "yang dan itu"]), entry(2, &["gizi"])]);
        let idx = CorpusIndex::build(&ds, &Normalizer::indonesian());
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.records()[0].entry, 1);
    }

    #[test]
    fn corpus_without_vocabulary_is_empty() {
        let ds = Dataset::new("t", vec![entry(1, &["...", "?"])]);
        let idx = CorpusIndex::build(&ds, &Normalizer::indonesian());
        assert!(idx.is_empty());
        assert!(idx.query_vector("stunting").is_none());
        assert!(idx.vectors().is_empty());
    }
}
