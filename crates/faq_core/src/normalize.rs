use crate::error::{FaqError, Result};
use crate::stem::{IndonesianStemmer, Stemmer};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Common Indonesian function words that carry no topical signal.
pub const INDONESIAN_STOPWORDS: &[&str] = &[
    "yang", "untuk", "pada", "ke", "para", "namun", "menurut", "antara", "dia", "dua", "ia",
    "seperti", "jika", "sehingga", "kembali", "dan", "tidak", "ini", "karena", "kepada", "oleh",
    "saat", "harus", "sementara", "setelah", "belum", "kami", "sekitar", "bagi", "serta", "di",
    "dari", "telah", "sebagai", "masih", "hal", "ketika", "adalah", "itu", "dalam", "bisa",
    "bahwa", "atau", "hanya", "kita", "dengan", "akan", "juga", "ada", "mereka", "sudah", "saya",
    "terhadap", "secara", "agar", "lain", "anda", "begitu", "mengapa", "kenapa", "yaitu", "yakni",
    "daripada", "itulah", "lagi", "maka", "tentang", "demi", "dimana", "kemana", "pula", "sambil",
    "sebelum", "sesudah", "supaya", "guna", "kah", "pun", "sampai", "sedangkan", "selagi",
    "tetapi", "apakah", "kecuali", "sebab", "selain", "seolah", "seraya", "seterusnya", "tanpa",
    "agak", "boleh", "dapat", "dsb", "dst", "dll", "dahulu", "dulunya", "anu", "demikian", "tapi",
    "ingin", "nggak", "mari", "nanti", "melainkan", "oh", "ok", "seharusnya", "sebetulnya",
    "setiap", "setidaknya", "sesuatu", "pasti", "saja", "toh", "ya", "walau", "tolong", "tentu",
    "amat", "apalagi", "bagaimanapun",
];

#[derive(Debug, Clone, Default)]
pub struct StopWords(HashSet<String>);

impl StopWords {
    pub fn indonesian() -> Self {
        Self(INDONESIAN_STOPWORDS.iter().map(|w| w.to_string()).collect())
    }

    /// One word per line; blank lines and `#` comments are ignored.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| FaqError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self(
            contents
                .lines()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .collect(),
        ))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Text canonicalization shared by corpus questions and user input.
///
/// Output is lowercase alphanumeric tokens joined by single spaces. Missing
/// stop-word or stemming stages are skipped rather than failing.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: Option<StopWords>,
    stemmer: Option<Arc<dyn Stemmer>>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::indonesian()
    }
}

impl Normalizer {
    pub fn indonesian() -> Self {
        Self {
            stopwords: Some(StopWords::indonesian()),
            stemmer: Some(Arc::new(IndonesianStemmer)),
        }
    }

    /// Case and punctuation folding only.
    pub fn plain() -> Self {
        Self {
            stopwords: None,
            stemmer: None,
        }
    }

    pub fn with_stopwords(mut self, stopwords: Option<StopWords>) -> Self {
        self.stopwords = stopwords;
        self
    }

    /// Replace the stop-word list from a file; an unreadable file disables the step.
    pub fn with_stopword_file(self, path: &Path) -> Self {
        match StopWords::from_file(path) {
            Ok(words) => self.with_stopwords(Some(words)),
            Err(err) => {
                warn!("stop-word list unavailable, skipping removal: {err}");
                self.with_stopwords(None)
            }
        }
    }

    pub fn with_stemmer(mut self, stemmer: Option<Arc<dyn Stemmer>>) -> Self {
        self.stemmer = stemmer;
        self
    }

    pub fn normalize(&self, text: &str) -> String {
        let folded: String = text
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        let mut tokens: Vec<String> = folded
            .split_whitespace()
            .filter(|t| !self.is_stopword(t))
            .map(str::to_string)
            .collect();

        if let Some(stemmer) = &self.stemmer {
            for token in &mut tokens {
                *token = stem_to_fixpoint(stemmer.as_ref(), token);
            }
            // Stemming can expose a stop-word.
            tokens.retain(|t| !t.is_empty() && !self.is_stopword(t));
        }

        tokens.join(" ")
    }

    fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.as_ref().is_some_and(|s| s.contains(token))
    }
}

fn stem_to_fixpoint(stemmer: &dyn Stemmer, token: &str) -> String {
    if !token.chars().all(char::is_alphabetic) {
        return token.to_string();
    }
    let mut current = token.to_string();
    loop {
        match stemmer.stem(&current) {
            Ok(next) if next.len() < current.len() && !next.is_empty() => current = next,
            Ok(_) => return current,
            Err(err) => {
                warn!(token, "stemming failed, keeping token: {err}");
                return current;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct BrokenStemmer;

    impl Stemmer for BrokenStemmer {
        fn stem(&self, word: &str) -> Result<String> {
            Err(FaqError::Stemming(word.to_string()))
        }
    }

    #[test]
    fn folds_case_punctuation_and_whitespace() {
        let n = Normalizer::plain();
        assert_eq!(n.normalize("  Apa   itu\tSTUNTING?!  "), "apa itu stunting");
        assert_eq!(n.normalize("e-samsat/online_info"), "e samsat online info");
    }

    #[test]
    fn empty_and_whitespace_input_yield_empty() {
        let n = Normalizer::indonesian();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize(" \t\n "), "");
        assert_eq!(n.normalize("?!..."), "");
    }

    #[test]
    fn removes_stopwords_and_stems() {
        let n = Normalizer::indonesian();
        assert_eq!(n.normalize("Apa itu stunting?"), "apa stunting");
        assert_eq!(
            n.normalize("Bagaimana cara pencegahan stunting pada anak?"),
            "bagaimana cara cegah stunting anak"
        );
    }

    #[test]
    fn is_idempotent() {
        let n = Normalizer::indonesian();
        for text in [
            "Apa itu stunting?",
            "Makanan bergizi untuk ibu hamil dan anaknya",
            "Kapan MPASI diberikan kepada bayi 6 bulan?",
            "Bagaimana mengajukan keberatan atas permohonan informasi publik?",
            "adanya pemberian ASI eksklusif 1000 hari",
            "",
        ] {
            let once = n.normalize(text);
            assert_eq!(n.normalize(&once), once, "input: {text}");
        }
    }

    #[test]
    fn missing_stopword_list_degrades_gracefully() {
        let n = Normalizer::indonesian().with_stopword_file(Path::new("/nonexistent/stopwords.txt"));
        assert_eq!(n.normalize("apa itu stunting"), "apa itu stunting");
    }

    #[test]
    fn failing_stemmer_keeps_tokens() {
        let n = Normalizer::indonesian().with_stemmer(Some(Arc::new(BrokenStemmer)));
        assert_eq!(n.normalize("pencegahan stunting"), "pencegahan stunting");
    }

    #[test]
    fn stopword_file_is_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stop.txt");
        std::fs::write(&path, "# custom\napa\n\nitu\n").expect("write");
        let n = Normalizer::plain().with_stopword_file(&path);
        assert_eq!(n.normalize("apa itu stunting"), "stunting");
    }
}
