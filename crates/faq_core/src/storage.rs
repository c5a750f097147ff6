use crate::error::{FaqError, Result};
use crate::model::{Dataset, FaqEntry};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Either a bare array of entries or `{"faqs": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Wrapped { faqs: Vec<FaqEntry> },
    Bare(Vec<FaqEntry>),
}

pub fn parse_dataset(name: &str, path: &Path, reader: impl std::io::Read) -> Result<Dataset> {
    let file: DatasetFile = serde_json::from_reader(reader).map_err(|source| FaqError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = match file {
        DatasetFile::Wrapped { faqs } => faqs,
        DatasetFile::Bare(entries) => entries,
    };

    if entries.is_empty() {
        return Err(FaqError::EmptyDataset(name.to_string()));
    }
    if let Some(bad) = entries.iter().find(|e| e.questions.is_empty()) {
        return Err(FaqError::MalformedEntry {
            dataset: name.to_string(),
            id: bad.id.to_string(),
            reason: "questions must not be empty".to_string(),
        });
    }

    Ok(Dataset::new(name, entries))
}

pub fn load_dataset(name: &str, path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| FaqError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_dataset(name, path, BufReader::new(file))?;
    info!(
        dataset = name,
        path = %path.display(),
        entries = dataset.entries.len(),
        "loaded FAQ dataset"
    );
    Ok(dataset)
}

/// Maps environment keys to dataset files named `faq_<env>.json`.
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    data_dir: PathBuf,
    files: BTreeMap<String, String>,
    default_env: String,
}

impl DatasetCatalog {
    /// Scan `data_dir` for `faq_*.json`; falls back to the stunting/ppid pair when nothing is found.
    pub fn discover(data_dir: &Path, default_env: &str) -> Self {
        let mut files = BTreeMap::new();
        match std::fs::read_dir(data_dir) {
            Ok(dir) => {
                for entry in dir.flatten() {
                    let fname = entry.file_name().to_string_lossy().into_owned();
                    if let Some(env) = env_from_file_name(&fname) {
                        files.insert(env, fname);
                    }
                }
            }
            Err(err) => warn!(dir = %data_dir.display(), "data directory not readable: {err}"),
        }

        if files.is_empty() {
            files.insert("stunting".to_string(), "faq_stunting.json".to_string());
            files.insert("ppid".to_string(), "faq_ppid.json".to_string());
        }

        Self {
            data_dir: data_dir.to_path_buf(),
            files,
            default_env: default_env.to_lowercase(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn environments(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    /// Dataset name (file name) serving `env`. Unknown environments use the default one.
    pub fn resolve(&self, env: &str) -> String {
        let env = env.trim().to_lowercase();
        self.files
            .get(&env)
            .or_else(|| self.files.get(&self.default_env))
            .cloned()
            .unwrap_or_else(|| format!("faq_{}.json", self.default_env))
    }

    pub fn path_of(&self, dataset: &str) -> PathBuf {
        self.data_dir.join(dataset)
    }

    pub fn load(&self, dataset: &str) -> Result<Dataset> {
        if dataset.contains(&['/', '\\'][..]) || !dataset.ends_with(".json") {
            return Err(FaqError::UnknownDataset(dataset.to_string()));
        }
        load_dataset(dataset, &self.path_of(dataset))
    }
}

fn env_from_file_name(fname: &str) -> Option<String> {
    let lower = fname.to_lowercase();
    let env = lower.strip_prefix("faq_")?.strip_suffix(".json")?;
    if env.is_empty() {
        None
    } else {
        Some(env.to_string())
    }
}
