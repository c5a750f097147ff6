use std::collections::BTreeMap;

/// L2-normalized sparse term vector, sorted by term index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    terms: Vec<(usize, f32)>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn nnz(&self) -> usize {
        self.terms.len()
    }

    fn normalized(mut terms: Vec<(usize, f32)>) -> Self {
        let norm = terms.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut terms {
                *w /= norm;
            }
        } else {
            terms.clear();
        }
        Self { terms }
    }
}

/// Cosine similarity of two normalized sparse vectors (a merge-join dot product).
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let (mut i, mut j, mut dot) = (0, 0, 0.0f32);
    while i < a.terms.len() && j < b.terms.len() {
        let (ta, wa) = a.terms[i];
        let (tb, wb) = b.terms[j];
        match ta.cmp(&tb) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += wa * wb;
                i += 1;
                j += 1;
            }
        }
    }
    dot.clamp(0.0, 1.0)
}

/// Term-frequency / smoothed inverse-document-frequency weighting fit on one corpus.
///
/// Tokens are whitespace-separated words of at least two characters; idf is
/// `ln((1 + n) / (1 + df)) + 1`. Terms unseen at fit time are ignored by
/// [`TfidfVectorizer::transform`].
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f32>,
}

fn tokens(doc: &str) -> impl Iterator<Item = &str> {
    doc.split_whitespace().filter(|t| t.chars().count() >= 2)
}

impl TfidfVectorizer {
    /// Fit on `docs` and return the vectorizer with one vector per document.
    /// `None` when the corpus yields no vocabulary at all.
    pub fn fit_transform(docs: &[String]) -> Option<(Self, Vec<SparseVector>)> {
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in docs {
            let mut seen: Vec<&str> = tokens(doc).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_default() += 1;
            }
        }
        if doc_freq.is_empty() {
            return None;
        }

        let n = docs.len() as f32;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (idx, (term, df)) in doc_freq.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), idx);
            idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
        }

        let vectorizer = Self { vocabulary, idf };
        let vectors = docs.iter().map(|d| vectorizer.transform(d)).collect();
        Some((vectorizer, vectors))
    }

    pub fn transform(&self, doc: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        for term in tokens(doc) {
            if let Some(&idx) = self.vocabulary.get(term) {
                *counts.entry(idx).or_default() += 1.0;
            }
        }
        SparseVector::normalized(
            counts
                .into_iter()
                .map(|(idx, tf)| (idx, tf * self.idf[idx]))
                .collect(),
        )
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "apa stunting".to_string(),
            "cegah stunting".to_string(),
            "asi eksklusif".to_string(),
        ]
    }

    #[test]
    fn identical_documents_have_unit_similarity() {
        let (v, docs) = TfidfVectorizer::fit_transform(&corpus()).expect("fit");
        let q = v.transform("cegah stunting");
        assert!((cosine_similarity(&q, &docs[1]) - 1.0).abs() < 1e-5);
        assert!(cosine_similarity(&q, &docs[2]).abs() < 1e-6);
    }

    #[test]
    fn shared_rare_terms_outweigh_common_ones() {
        let (v, docs) = TfidfVectorizer::fit_transform(&corpus()).expect("fit");
        let q = v.transform("cegah");
        let s_cegah = cosine_similarity(&q, &docs[1]);
        let q2 = v.transform("stunting");
        let s_stunting = cosine_similarity(&q2, &docs[1]);
        assert!(s_cegah > s_stunting);
    }

    #[test]
    fn unknown_terms_produce_empty_vector() {
        let (v, docs) = TfidfVectorizer::fit_transform(&corpus()).expect("fit");
        let q = v.transform("imunisasi posyandu");
        assert!(q.is_empty());
        assert_eq!(cosine_similarity(&q, &docs[0]), 0.0);
    }

    #[test]
    fn single_letter_corpus_has_no_vocabulary() {
        assert!(TfidfVectorizer::fit_transform(&["a b c".to_string()]).is_none());
        assert!(TfidfVectorizer::fit_transform(&[]).is_none());
    }

    #[test]
    fn idf_smoothing_matches_formula() {
        let (v, _) = TfidfVectorizer::fit_transform(&corpus()).expect("fit");
        let idx = v.vocabulary["stunting"];
        let expected = ((1.0f32 + 3.0) / (1.0 + 2.0)).ln() + 1.0;
        assert!((v.idf[idx] - expected).abs() < 1e-6);
    }
}
