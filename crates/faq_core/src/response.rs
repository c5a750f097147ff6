use crate::category::CategoryHit;
use crate::config::EngineConfig;
use crate::engine::Snapshot;
use crate::model::{Decision, FaqEntry, FaqResponse, Link, ResponseStatus};
use crate::normalize::Normalizer;
use crate::retrieval::decide;
use tracing::{debug, info};

pub const UNKNOWN_CATEGORY: &str = "unknown";
pub const SYSTEM_ERROR_CATEGORY: &str = "system_error";
pub const SYSTEM_ERROR_MESSAGE: &str = "Maaf, terjadi kesalahan sistem. Silakan coba lagi nanti.";

const PPID_FALLBACK: &[&str] = &[
    "Maaf, saya tidak dapat menemukan jawaban yang tepat untuk pertanyaan Anda.",
    "Berikut beberapa topik yang bisa saya bantu:",
    "• Apa itu PPID?",
    "• Cara permohonan informasi publik",
    "• Prosedur pengajuan keberatan",
    "• Jenis informasi publik",
    "• Layanan website PPID",
    "• Kontak dan alamat PPID",
    "",
    "Silakan ajukan pertanyaan dengan kata kunci yang lebih spesifik, atau hubungi petugas PPID untuk informasi lebih lanjut.",
];

const HEALTH_FALLBACK: &[&str] = &[
    "Maaf, saya tidak dapat menemukan jawaban yang tepat untuk pertanyaan Anda.",
    "Berikut beberapa topik yang bisa saya bantu:",
    "• Apa itu stunting?",
    "• Penyebab dan cara mencegah stunting",
    "• Gizi ibu hamil dan ASI eksklusif",
    "• MPASI dan nutrisi anak",
    "• Imunisasi dan posyandu",
    "",
    "Silakan ajukan pertanyaan dengan kata kunci yang lebih spesifik, atau hubungi petugas kesehatan untuk informasi lebih lanjut.",
];

/// Canned "no answer" text for an environment.
pub fn fallback_message(environment: &str) -> String {
    let lines = if environment.to_lowercase().contains("ppid") {
        PPID_FALLBACK
    } else {
        HEALTH_FALLBACK
    };
    lines.join("\n")
}

/// Answer followed by a readable list of its links.
pub fn format_with_links(answer: &str, links: &[Link]) -> String {
    let mut out = String::from(answer);
    if !links.is_empty() {
        out.push_str("\n\nLink terkait:");
        for link in links {
            out.push_str(&format!("\n• {}: {}", link.text, link.url));
        }
    }
    out
}

pub fn category_response(
    hit: &CategoryHit,
    entry: Option<&FaqEntry>,
    config: &EngineConfig,
) -> FaqResponse {
    match entry {
        Some(faq) => FaqResponse {
            answer: faq.answer.clone(),
            confidence: config.category_confidence,
            category: hit.category.clone(),
            faq_id: Some(faq.id.clone()),
            status: ResponseStatus::Found,
            matched_keyword: Some(hit.matched_keyword.clone()),
            links: faq.links.clone(),
            formatted_answer: None,
        },
        None => FaqResponse {
            answer: format!("{} dapat ditemukan di", hit.description),
            confidence: config.category_confidence,
            category: hit.category.clone(),
            faq_id: None,
            status: ResponseStatus::CategoryShortcut,
            matched_keyword: Some(hit.matched_keyword.clone()),
            links: vec![config.reference_link.clone()],
            formatted_answer: None,
        },
    }
}

pub fn entry_response(faq: &FaqEntry, score: f32) -> FaqResponse {
    let formatted_answer =
        (!faq.links.is_empty()).then(|| format_with_links(&faq.answer, &faq.links));
    FaqResponse {
        answer: faq.answer.clone(),
        confidence: score,
        category: faq.category.clone(),
        faq_id: Some(faq.id.clone()),
        status: ResponseStatus::Found,
        matched_keyword: None,
        links: faq.links.clone(),
        formatted_answer,
    }
}

pub fn not_found_response(environment: &str, score: f32) -> FaqResponse {
    FaqResponse {
        answer: fallback_message(environment),
        confidence: score,
        category: UNKNOWN_CATEGORY.to_string(),
        faq_id: None,
        status: ResponseStatus::NotFound,
        matched_keyword: None,
        links: Vec::new(),
        formatted_answer: None,
    }
}

pub fn system_error_response() -> FaqResponse {
    FaqResponse {
        answer: SYSTEM_ERROR_MESSAGE.to_string(),
        confidence: 0.0,
        category: SYSTEM_ERROR_CATEGORY.to_string(),
        faq_id: None,
        status: ResponseStatus::Error,
        matched_keyword: None,
        links: Vec::new(),
        formatted_answer: None,
    }
}

/// Category shortcut first, then similarity scoring, then the environment fallback.
pub fn generate(
    question: &str,
    environment: &str,
    snapshot: &Snapshot,
    normalizer: &Normalizer,
    config: &EngineConfig,
) -> FaqResponse {
    if let Some(hit) = snapshot.categories.find(question, &config.matcher) {
        info!(
            category = %hit.category,
            keyword = %hit.matched_keyword,
            fallback_table = snapshot.categories.is_fallback(),
            "category shortcut"
        );
        let entry = hit.entry.and_then(|pos| snapshot.dataset.entries.get(pos));
        return category_response(&hit, entry, config);
    }

    let m = decide(question, &snapshot.index, normalizer, config.match_threshold);
    let entry = m.entry.and_then(|pos| snapshot.dataset.entries.get(pos));
    match (m.decision, entry) {
        (Decision::Hit, Some(faq)) => {
            info!(id = %faq.id, confidence = m.score, links = faq.links.len(), "answer found");
            entry_response(faq, m.score)
        }
        _ => {
            debug!(confidence = m.score, environment, "no suitable answer");
            not_found_response(environment, m.score)
        }
    }
}
