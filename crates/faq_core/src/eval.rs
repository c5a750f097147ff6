use crate::engine::FaqEngine;
use crate::model::{FaqId, ResponseStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const DEFAULT_REQUIRED_PASS_RATE: f32 = 0.85;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    pub case_id: String,
    pub question: String,
    /// Falls back to the engine's default environment.
    #[serde(default)]
    pub environment: Option<String>,
    pub expected_status: ResponseStatus,
    #[serde(default)]
    pub expected_faq_id: Option<FaqId>,
    #[serde(default)]
    pub min_confidence: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOutcome {
    pub case_id: String,
    pub passed: bool,
    pub actual_status: ResponseStatus,
    pub actual_faq_id: Option<FaqId>,
    pub category: String,
    pub confidence: f32,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f32,
    pub outcomes: Vec<EvalOutcome>,
}

impl EvalSummary {
    pub fn meets(&self, required_pass_rate: f32) -> bool {
        self.pass_rate >= required_pass_rate
    }
}

pub struct CaseExpectation;

impl CaseExpectation {
    pub fn matches(
        case: &EvalCase,
        actual_status: ResponseStatus,
        actual_faq_id: Option<&FaqId>,
        confidence: f32,
    ) -> bool {
        if case.expected_status != actual_status {
            return false;
        }

        if let Some(expected) = &case.expected_faq_id {
            if actual_faq_id != Some(expected) {
                return false;
            }
        }

        if let Some(min) = case.min_confidence {
            if confidence < min {
                return false;
            }
        }

        true
    }
}

pub fn evaluate_cases(engine: &FaqEngine, cases: &[EvalCase]) -> EvalSummary {
    let started_at = Utc::now();
    let mut outcomes = Vec::with_capacity(cases.len());

    for case in cases {
        let env = case
            .environment
            .as_deref()
            .unwrap_or(&engine.config().default_environment);
        let start = Instant::now();
        let response = engine.respond(&case.question, env);
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let passed = CaseExpectation::matches(
            case,
            response.status,
            response.faq_id.as_ref(),
            response.confidence,
        );

        outcomes.push(EvalOutcome {
            case_id: case.case_id.clone(),
            passed,
            actual_status: response.status,
            actual_faq_id: response.faq_id,
            category: response.category,
            confidence: response.confidence,
            latency_ms,
        });
    }

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed).count();
    let failed = total.saturating_sub(passed);
    let pass_rate = if total == 0 {
        0.0
    } else {
        passed as f32 / total as f32
    };

    EvalSummary {
        started_at,
        total,
        passed,
        failed,
        pass_rate,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn case(json: &str) -> EvalCase {
        serde_json::from_str(json).expect("case")
    }

    #[test]
    fn expectation_checks_status_id_and_confidence() {
        let c = case(
            r#"{"case_id": "c1", "question": "q", "expected_status": "found",
                "expected_faq_id": 4, "min_confidence": 0.5}"#,
        );
        let id = FaqId::Num(4);
        assert!(CaseExpectation::matches(&c, ResponseStatus::Found, Some(&id), 0.6));
        assert!(!CaseExpectation::matches(&c, ResponseStatus::Found, Some(&id), 0.4));
        assert!(!CaseExpectation::matches(&c, ResponseStatus::Found, Some(&FaqId::Num(5)), 0.9));
        assert!(!CaseExpectation::matches(&c, ResponseStatus::NotFound, None, 0.9));
    }

    #[test]
    fn evaluates_against_engine() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("faq_stunting.json"),
            r#"[{"id": 1, "category": "definisi", "questions": ["apa itu stunting"], "answer": "Stunting adalah..."}]"#,
        )
        .expect("write");
        let engine = FaqEngine::new(EngineConfig {
            data_dir: dir.path().to_path_buf(),
            ..EngineConfig::default()
        });
        let cases = vec![
            case(r#"{"case_id": "hit", "question": "apa itu stunting?", "expected_status": "found", "expected_faq_id": 1}"#),
            case(r#"{"case_id": "miss", "question": "harga tiket kereta", "expected_status": "not_found"}"#),
            case(r#"{"case_id": "wrong", "question": "harga tiket kereta", "expected_status": "found"}"#),
        ];

        let summary = evaluate_cases(&engine, &cases);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.meets(DEFAULT_REQUIRED_PASS_RATE));
        assert!(!summary.outcomes[2].passed);
    }
}
