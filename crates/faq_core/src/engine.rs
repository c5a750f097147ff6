use crate::category::CategoryTable;
use crate::config::EngineConfig;
use crate::error::{FaqError, Result};
use crate::index::CorpusIndex;
use crate::model::{CategoryInfo, Dataset, DatasetStats, FaqEntry, FaqResponse};
use crate::normalize::Normalizer;
use crate::response::{generate, system_error_response};
use crate::storage::DatasetCatalog;
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// One immutable dataset generation: entries, corpus index and category table.
#[derive(Debug)]
pub struct Snapshot {
    pub dataset: Dataset,
    pub index: CorpusIndex,
    pub categories: CategoryTable,
}

impl Snapshot {
    pub fn build(dataset: Dataset, normalizer: &Normalizer) -> Self {
        let index = CorpusIndex::build(&dataset, normalizer);
        let categories = CategoryTable::build(&dataset);
        Self {
            dataset,
            index,
            categories,
        }
    }

    pub fn empty() -> Self {
        Self::build(Dataset::new("", Vec::new()), &Normalizer::plain())
    }

    pub fn name(&self) -> &str {
        &self.dataset.name
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            entry_count: self.dataset.entries.len(),
            question_count: self.dataset.question_count(),
            category_count: self.dataset.categories().len(),
        }
    }
}

/// Holds the active snapshot and replaces it wholesale.
///
/// Readers clone the `Arc` and keep using it for the whole request; a switch
/// builds the next snapshot off to the side and publishes it in one store.
#[derive(Debug)]
pub struct DatasetSwitcher {
    catalog: DatasetCatalog,
    normalizer: Normalizer,
    active: RwLock<Arc<Snapshot>>,
    switching: Mutex<()>,
}

impl DatasetSwitcher {
    pub fn new(catalog: DatasetCatalog, normalizer: Normalizer) -> Self {
        Self {
            catalog,
            normalizer,
            active: RwLock::new(Arc::new(Snapshot::empty())),
            switching: Mutex::new(()),
        }
    }

    pub fn catalog(&self) -> &DatasetCatalog {
        &self.catalog
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.active.read())
    }

    pub fn switch(&self, name: &str) -> Result<Arc<Snapshot>> {
        self.switch_cancellable(name, &AtomicBool::new(false))
    }

    /// Load `name` and publish it, returning the snapshot now in force.
    ///
    /// Switching to the active dataset is a no-op. On any failure, including
    /// `cancel` being raised before publication, the previous snapshot stays.
    pub fn switch_cancellable(&self, name: &str, cancel: &AtomicBool) -> Result<Arc<Snapshot>> {
        let _guard = self.switching.lock();

        let current = self.snapshot();
        if current.name() == name {
            return Ok(current);
        }

        let checkpoint = || {
            if cancel.load(Ordering::Acquire) {
                Err(FaqError::Cancelled(name.to_string()))
            } else {
                Ok(())
            }
        };

        checkpoint()?;
        let dataset = self.catalog.load(name)?;
        checkpoint()?;
        let next = Arc::new(Snapshot::build(dataset, &self.normalizer));
        checkpoint()?;

        *self.active.write() = Arc::clone(&next);
        info!(
            from = current.name(),
            to = name,
            entries = next.dataset.entries.len(),
            fallback_categories = next.categories.is_fallback(),
            "dataset switched"
        );
        Ok(next)
    }

    /// Publish an already-loaded dataset, bypassing the catalog.
    pub fn install(&self, dataset: Dataset) -> Arc<Snapshot> {
        let _guard = self.switching.lock();
        let next = Arc::new(Snapshot::build(dataset, &self.normalizer));
        *self.active.write() = Arc::clone(&next);
        next
    }
}

/// Matching engine front door: environment resolution, dataset switching and responses.
#[derive(Debug)]
pub struct FaqEngine {
    config: EngineConfig,
    switcher: DatasetSwitcher,
}

impl FaqEngine {
    /// Discover datasets under `config.data_dir` and load the default environment.
    ///
    /// A missing or malformed default dataset leaves the engine serving an
    /// empty snapshot rather than failing.
    pub fn new(config: EngineConfig) -> Self {
        let catalog = DatasetCatalog::discover(&config.data_dir, &config.default_environment);
        let engine = Self::with_catalog(config, catalog, Normalizer::indonesian());
        let initial = engine.switcher.catalog().resolve(&engine.config.default_environment);
        if let Err(err) = engine.switcher.switch(&initial) {
            error!(dataset = %initial, "failed to load default dataset: {err}");
        }
        engine
    }

    pub fn with_catalog(config: EngineConfig, catalog: DatasetCatalog, normalizer: Normalizer) -> Self {
        Self {
            config,
            switcher: DatasetSwitcher::new(catalog, normalizer),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn switcher(&self) -> &DatasetSwitcher {
        &self.switcher
    }

    pub fn environments(&self) -> Vec<String> {
        self.switcher.catalog().environments()
    }

    pub fn active_dataset(&self) -> String {
        self.switcher.snapshot().name().to_string()
    }

    pub fn switch_dataset(&self, name: &str) -> Result<()> {
        self.switcher.switch(name).map(|_| ())
    }

    /// Snapshot serving `environment`, switching datasets when needed.
    /// A failed switch keeps serving the previous dataset.
    pub fn snapshot_for(&self, environment: &str) -> Arc<Snapshot> {
        let wanted = self.switcher.catalog().resolve(environment);
        let current = self.switcher.snapshot();
        if current.name() == wanted {
            return current;
        }
        match self.switcher.switch(&wanted) {
            Ok(next) => next,
            Err(err) => {
                warn!(environment, dataset = %wanted, "switch failed, serving {}: {err}", current.name());
                current
            }
        }
    }

    pub fn respond(&self, question: &str, environment: &str) -> FaqResponse {
        let snapshot = self.snapshot_for(environment);
        let normalizer = self.switcher.normalizer();
        let result = catch_unwind(AssertUnwindSafe(|| {
            generate(question, environment, &snapshot, normalizer, &self.config)
        }));
        match result {
            Ok(response) => response,
            Err(_) => {
                error!(environment, "internal fault while answering; returning system error");
                system_error_response()
            }
        }
    }

    pub fn list_categories(&self, environment: &str) -> Vec<CategoryInfo> {
        self.snapshot_for(environment)
            .dataset
            .categories()
            .into_iter()
            .map(|category| CategoryInfo {
                description: category_description(&category),
                category,
            })
            .collect()
    }

    pub fn list_entries(&self, environment: &str) -> Vec<FaqEntry> {
        self.snapshot_for(environment).dataset.entries.clone()
    }

    pub fn questions_by_category(&self, environment: &str, category: &str) -> Vec<String> {
        self.snapshot_for(environment)
            .dataset
            .entries
            .iter()
            .filter(|e| e.category_key() == category)
            .flat_map(|e| e.questions.iter().cloned())
            .collect()
    }

    pub fn stats(&self, environment: &str) -> DatasetStats {
        self.snapshot_for(environment).stats()
    }
}

/// Trimmed question, or `InvalidQuestion` when empty or longer than `max_chars`.
pub fn validate_question(text: &str, max_chars: usize) -> Result<&str> {
    let question = text.trim();
    if question.is_empty() {
        return Err(FaqError::InvalidQuestion("question cannot be empty".to_string()));
    }
    if question.chars().count() > max_chars {
        return Err(FaqError::InvalidQuestion(format!(
            "question too long (max {max_chars} characters)"
        )));
    }
    Ok(question)
}

const GENERIC_DESCRIPTIONS: &[(&str, &str)] = &[
    ("umum", "Informasi umum"),
    ("prosedur", "Prosedur permohonan dan keberatan"),
    ("informasi", "Jenis informasi publik"),
    ("kontak", "Informasi kontak"),
    ("layanan", "Layanan website"),
    ("definisi", "Pengertian dan definisi stunting"),
    ("penyebab", "Faktor penyebab terjadinya stunting"),
    ("gejala", "Ciri-ciri dan tanda-tanda stunting"),
    ("pencegahan", "Cara mencegah stunting"),
    ("dampak", "Akibat dan dampak stunting"),
    ("asi", "ASI eksklusif dan menyusui"),
    ("mpasi", "Makanan pendamping ASI"),
    ("gizi_ibu", "Gizi dan nutrisi ibu hamil"),
    ("posyandu", "Posyandu dan pemantauan"),
    ("periode_emas", "1000 hari pertama kehidupan"),
];

/// Listing description: a known label, else the title-cased category name.
pub fn category_description(category: &str) -> String {
    if let Some((_, desc)) = GENERIC_DESCRIPTIONS.iter().find(|(c, _)| *c == category) {
        return desc.to_string();
    }
    category
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
