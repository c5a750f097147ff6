use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use faq_core::{
    evaluate_cases, validate_question, EngineConfig, EvalCase, FaqEngine,
    DEFAULT_REQUIRED_PASS_RATE,
};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "faq")]
#[command(about = "FAQ matching engine CLI")]
struct Cli {
    /// TOML config file. Flags below override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding faq_<env>.json datasets.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    match_threshold: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Answer one question.
    Ask {
        #[arg(long)]
        question: String,
        #[arg(long)]
        env: Option<String>,
        #[arg(long)]
        json: bool,
    },
    Categories {
        #[arg(long)]
        env: Option<String>,
    },
    Faqs {
        #[arg(long)]
        env: Option<String>,
    },
    Stats {
        #[arg(long)]
        env: Option<String>,
    },
    /// List supported environments.
    Envs,
    /// Load a dataset file by name and report whether it would be served.
    Switch {
        #[arg(long)]
        dataset: String,
    },
    Eval {
        #[arg(long)]
        cases: PathBuf,
        #[arg(long, default_value_t = DEFAULT_REQUIRED_PASS_RATE)]
        min_pass_rate: f32,
    },
}

#[derive(Serialize)]
struct StatsOutput<'a> {
    total_faqs: usize,
    total_questions: usize,
    categories: usize,
    env: &'a str,
    status: &'a str,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(threshold) = cli.match_threshold {
        anyhow::ensure!(
            (0.0..=1.0).contains(&threshold),
            "--match-threshold must be within [0, 1]"
        );
        config.match_threshold = threshold;
    }
    Ok(config)
}

fn read_eval_cases_json(path: &Path) -> Result<Vec<EvalCase>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let cases: Vec<EvalCase> = serde_json::from_reader(file).context("parse eval cases json")?;
    Ok(cases)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("serialize output")?
    );
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let default_env = config.default_environment.clone();
    let max_chars = config.max_question_chars;
    let engine = FaqEngine::new(config);
    let env_or_default = |env: &Option<String>| env.clone().unwrap_or_else(|| default_env.clone());

    match &cli.command {
        Commands::Ask {
            question,
            env,
            json,
        } => {
            let question = validate_question(question, max_chars)?;
            let env = env_or_default(env);
            let response = engine.respond(question, &env);

            if *json {
                print_json(&response)?;
            } else {
                println!(
                    "env={} status={:?} confidence={:.4} category={} faq_id={}",
                    env,
                    response.status,
                    response.confidence,
                    response.category,
                    response
                        .faq_id
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| "null".to_string())
                );
                println!("{}", response.display_answer());
                if response.formatted_answer.is_none() {
                    for link in &response.links {
                        println!("link={} url={}", link.text, link.url);
                    }
                }
            }
        }
        Commands::Categories { env } => {
            let env = env_or_default(env);
            for info in engine.list_categories(&env) {
                println!("{}\t{}", info.category, info.description);
            }
        }
        Commands::Faqs { env } => {
            let env = env_or_default(env);
            print_json(&serde_json::json!({ "faqs": engine.list_entries(&env) }))?;
        }
        Commands::Stats { env } => {
            let env = env_or_default(env);
            let stats = engine.stats(&env);
            print_json(&StatsOutput {
                total_faqs: stats.entry_count,
                total_questions: stats.question_count,
                categories: stats.category_count,
                env: &env,
                status: if stats.entry_count > 0 { "active" } else { "empty" },
            })?;
        }
        Commands::Envs => {
            println!("active={}", engine.active_dataset());
            for env in engine.environments() {
                println!("{env}");
            }
        }
        Commands::Switch { dataset } => {
            engine
                .switch_dataset(dataset)
                .with_context(|| format!("switch to {dataset}"))?;
            let stats = engine.switcher().snapshot().stats();
            println!(
                "dataset={} entries={} questions={} categories={}",
                engine.active_dataset(),
                stats.entry_count,
                stats.question_count,
                stats.category_count
            );
        }
        Commands::Eval {
            cases,
            min_pass_rate,
        } => {
            let cases = read_eval_cases_json(cases)?;
            let summary = evaluate_cases(&engine, &cases);

            for o in &summary.outcomes {
                println!(
                    "case={} passed={} status={:?} faq_id={} confidence={:.4} latency={:.1}ms",
                    o.case_id,
                    o.passed,
                    o.actual_status,
                    o.actual_faq_id
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| "null".to_string()),
                    o.confidence,
                    o.latency_ms
                );
            }
            println!(
                "total={} passed={} failed={} pass_rate={:.4} required={:.4}",
                summary.total, summary.passed, summary.failed, summary.pass_rate, min_pass_rate
            );

            if !summary.meets(*min_pass_rate) {
                anyhow::bail!(
                    "pass rate {:.4} below required {:.4}",
                    summary.pass_rate,
                    min_pass_rate
                );
            }
        }
    }

    Ok(())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ask_with_global_flags() {
        let cli = Cli::try_parse_from([
            "faq",
            "ask",
            "--question",
            "apa itu stunting",
            "--env",
            "ppid",
            "--data-dir",
            "/tmp/data",
        ])
        .expect("parse");
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/data")));
        match cli.command {
            Commands::Ask { question, env, json } => {
                assert_eq!(question, "apa itu stunting");
                assert_eq!(env.as_deref(), Some("ppid"));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from(["faq", "--match-threshold", "0.5", "envs"]).expect("parse");
        let cfg = load_config(&cli).expect("config");
        assert!((cfg.match_threshold - 0.5).abs() < 1e-6);

        let bad = Cli::try_parse_from(["faq", "--match-threshold", "1.5", "envs"]).expect("parse");
        assert!(load_config(&bad).is_err());
    }
}
