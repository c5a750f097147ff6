use serde::{Deserialize, Serialize};
use std::fmt;

/// Dataset identifiers arrive either as JSON numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaqId {
    Num(i64),
    Text(String),
}

impl fmt::Display for FaqId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaqId::Num(n) => write!(f, "{n}"),
            FaqId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: FaqId,
    #[serde(default)]
    pub category: String,
    pub questions: Vec<String>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl FaqEntry {
    /// Category key used for grouping; entries without a category get `faq_<id>`.
    pub fn category_key(&self) -> String {
        if self.category.trim().is_empty() {
            format!("faq_{}", self.id)
        } else {
            self.category.clone()
        }
    }
}

/// A named, immutable collection of FAQ entries for one environment.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub entries: Vec<FaqEntry>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, entries: Vec<FaqEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn question_count(&self) -> usize {
        self.entries.iter().map(|e| e.questions.len()).sum()
    }

    /// Distinct entry category keys, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = self.entries.iter().map(FaqEntry::category_key).collect();
        cats.sort();
        cats.dedup();
        cats
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Hit,
    Miss,
}

/// Outcome of similarity scoring: the winning corpus entry (by position in the
/// dataset) when the combined score clears the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalMatch {
    pub entry: Option<usize>,
    pub score: f32,
    pub decision: Decision,
}

impl RetrievalMatch {
    pub fn miss(score: f32) -> Self {
        Self {
            entry: None,
            score,
            decision: Decision::Miss,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Answer taken verbatim from an FAQ entry.
    Found,
    /// Keyword hit on a category with no backing entry.
    CategoryShortcut,
    NotFound,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqResponse {
    pub answer: String,
    pub confidence: f32,
    pub category: String,
    pub faq_id: Option<FaqId>,
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_answer: Option<String>,
}

impl FaqResponse {
    /// The text a client should display: the formatted variant when present.
    pub fn display_answer(&self) -> &str {
        self.formatted_answer.as_deref().unwrap_or(&self.answer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub entry_count: usize,
    pub question_count: usize,
    pub category_count: usize,
}
