use crate::error::{FaqError, Result};
use crate::model::Link;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.35;
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 85;
pub const DEFAULT_FUZZY_SHORT_THRESHOLD: u8 = 90;
pub const DEFAULT_SHORT_KEYWORD_MAX_CHARS: usize = 4;
pub const DEFAULT_MAX_QUESTION_CHARS: usize = 500;
pub const DEFAULT_CATEGORY_CONFIDENCE: f32 = 0.95;
pub const DEFAULT_ENVIRONMENT: &str = "stunting";
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Keyword shortcut tuning. Ratios are on the 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub fuzzy_threshold: u8,
    pub fuzzy_short_threshold: u8,
    pub short_keyword_max_chars: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            fuzzy_short_threshold: DEFAULT_FUZZY_SHORT_THRESHOLD,
            short_keyword_max_chars: DEFAULT_SHORT_KEYWORD_MAX_CHARS,
        }
    }
}

impl MatcherConfig {
    pub fn threshold_for(&self, keyword: &str) -> u8 {
        if keyword.chars().count() <= self.short_keyword_max_chars {
            self.fuzzy_short_threshold
        } else {
            self.fuzzy_threshold
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub default_environment: String,
    pub match_threshold: f32,
    pub max_question_chars: usize,
    pub category_confidence: f32,
    pub reference_link: Link,
    #[serde(flatten)]
    pub matcher: MatcherConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            default_environment: DEFAULT_ENVIRONMENT.to_string(),
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            max_question_chars: DEFAULT_MAX_QUESTION_CHARS,
            category_confidence: DEFAULT_CATEGORY_CONFIDENCE,
            reference_link: Link {
                text: "Lihat Daftar Informasi Berkala PPID".to_string(),
                url: "https://ppid.sukoharjokab.go.id/daftar-informasi-berkala/".to_string(),
            },
            matcher: MatcherConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| FaqError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}
