pub mod category;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod fuzzy;
pub mod index;
pub mod model;
pub mod normalize;
pub mod response;
pub mod retrieval;
pub mod stem;
pub mod storage;
pub mod tfidf;

pub use category::{Category, CategoryHit, CategorySet, CategoryTable};
pub use config::{
    EngineConfig, MatcherConfig, DEFAULT_ENVIRONMENT, DEFAULT_FUZZY_SHORT_THRESHOLD,
    DEFAULT_FUZZY_THRESHOLD, DEFAULT_MATCH_THRESHOLD, DEFAULT_MAX_QUESTION_CHARS,
};
pub use engine::{category_description, validate_question, DatasetSwitcher, FaqEngine, Snapshot};
pub use error::{FaqError, Result};
pub use eval::{
    evaluate_cases, CaseExpectation, EvalCase, EvalOutcome, EvalSummary,
    DEFAULT_REQUIRED_PASS_RATE,
};
pub use index::{CorpusIndex, QuestionRecord};
pub use model::{
    CategoryInfo, Dataset, DatasetStats, Decision, FaqEntry, FaqId, FaqResponse, Link,
    ResponseStatus, RetrievalMatch,
};
pub use normalize::{Normalizer, StopWords};
pub use retrieval::{combined_score, decide, top_match};
pub use stem::{IndonesianStemmer, Stemmer};
pub use storage::{load_dataset, DatasetCatalog};
