use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("faq"))
}

const STUNTING: &str = r#"{"faqs": [
  {"id": 1, "category": "definisi", "questions": ["Apa itu stunting?"],
   "answer": "Stunting adalah kondisi gagal tumbuh pada anak balita."},
  {"id": 2, "category": "pencegahan", "questions": ["Bagaimana cara mencegah stunting pada anak?"],
   "answer": "Berikan gizi seimbang dan ASI eksklusif.",
   "links": [{"text": "Panduan Gizi", "url": "https://example.org/gizi"}]}
]}"#;

const PPID: &str = r#"[
  {"id": "p1", "category": "umum", "questions": ["Apa itu PPID?"],
   "answer": "PPID adalah pejabat pengelola informasi dan dokumentasi."}
]"#;

fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("faq_stunting.json"), STUNTING).expect("write stunting");
    fs::write(dir.path().join("faq_ppid.json"), PPID).expect("write ppid");
    dir
}

fn ask_json(dir: &Path, question: &str, env: Option<&str>) -> Value {
    let mut cmd = bin();
    cmd.arg("--data-dir").arg(dir).args(["ask", "--json", "--question", question]);
    if let Some(env) = env {
        cmd.args(["--env", env]);
    }
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).expect("response json")
}

#[test]
fn ask_finds_exact_question() {
    let dir = data_dir();
    let v = ask_json(dir.path(), "Apa itu stunting?", None);
    assert_eq!(v["status"], "found");
    assert_eq!(v["faq_id"], 1);
    assert_eq!(v["category"], "definisi");
    assert!(v["answer"].as_str().unwrap_or_default().starts_with("Stunting adalah"));
}

#[test]
fn ask_switches_to_requested_environment() {
    let dir = data_dir();
    let v = ask_json(dir.path(), "apa itu ppid?", Some("ppid"));
    assert_eq!(v["status"], "found");
    assert_eq!(v["faq_id"], "p1");
}

#[test]
fn unmatched_question_returns_environment_fallback() {
    let dir = data_dir();
    let v = ask_json(dir.path(), "jadwal keberangkatan kereta api", Some("ppid"));
    assert_eq!(v["status"], "not_found");
    assert_eq!(v["category"], "unknown");
    assert!(v["faq_id"].is_null());
    assert!(v["answer"].as_str().unwrap_or_default().contains("petugas PPID"));
}

#[test]
fn static_categories_answer_when_no_dataset_is_loaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let v = ask_json(dir.path(), "di mana laporan lkjip tahun ini", None);
    assert_eq!(v["status"], "category_shortcut");
    assert_eq!(v["category"], "kinerja");
    assert_eq!(v["matched_keyword"], "lkjip");
    assert_eq!(v["links"].as_array().map(Vec::len), Some(1));
}

#[test]
fn plain_ask_prints_status_line_and_answer() {
    let dir = data_dir();
    bin()
        .arg("--data-dir")
        .arg(dir.path())
        .args(["ask", "--question", "Apa itu stunting?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("env=stunting status=Found"))
        .stdout(predicate::str::contains("Stunting adalah kondisi gagal tumbuh"));
}

#[test]
fn empty_question_is_rejected() {
    let dir = data_dir();
    bin()
        .arg("--data-dir")
        .arg(dir.path())
        .args(["ask", "--question", "   "])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("question cannot be empty"));
}

#[test]
fn stats_reports_active_dataset() {
    let dir = data_dir();
    let out = bin()
        .arg("--data-dir")
        .arg(dir.path())
        .args(["stats", "--env", "stunting"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).expect("stats json");
    assert_eq!(v["total_faqs"], 2);
    assert_eq!(v["total_questions"], 2);
    assert_eq!(v["categories"], 2);
    assert_eq!(v["status"], "active");

    let empty = tempfile::tempdir().expect("tempdir");
    bin()
        .arg("--data-dir")
        .arg(empty.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"empty\""));
}

#[test]
fn envs_lists_discovered_datasets() {
    let dir = data_dir();
    bin()
        .arg("--data-dir")
        .arg(dir.path())
        .arg("envs")
        .assert()
        .success()
        .stdout(predicate::str::contains("active=faq_stunting.json"))
        .stdout(predicate::str::contains("ppid"));
}

#[test]
fn switch_rejects_unknown_dataset() {
    let dir = data_dir();
    bin()
        .arg("--data-dir")
        .arg(dir.path())
        .args(["switch", "--dataset", "faq_missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("switch to faq_missing.json"));

    bin()
        .arg("--data-dir")
        .arg(dir.path())
        .args(["switch", "--dataset", "faq_ppid.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dataset=faq_ppid.json entries=1"));
}

#[test]
fn eval_enforces_pass_rate() {
    let dir = data_dir();
    let cases = dir.path().join("cases.json");
    fs::write(
        &cases,
        r#"[
          {"case_id": "def", "question": "Apa itu stunting?", "expected_status": "found", "expected_faq_id": 1},
          {"case_id": "ppid", "question": "Apa itu PPID?", "environment": "ppid",
           "expected_status": "found", "expected_faq_id": "p1"}
        ]"#,
    )
    .expect("write cases");

    bin()
        .arg("--data-dir")
        .arg(dir.path())
        .arg("eval")
        .arg("--cases")
        .arg(&cases)
        .assert()
        .success()
        .stdout(predicate::str::contains("total=2 passed=2 failed=0"));

    let failing = dir.path().join("failing.json");
    fs::write(
        &failing,
        r#"[{"case_id": "wrong", "question": "Apa itu stunting?", "expected_status": "not_found"}]"#,
    )
    .expect("write failing cases");

    bin()
        .arg("--data-dir")
        .arg(dir.path())
        .arg("eval")
        .arg("--cases")
        .arg(&failing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("below required"));
}
