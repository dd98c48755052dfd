//! symtriage: symptom triage from the command line.
//!
//! Usage:
//!   symtriage symptoms --search pain
//!   symtriage evaluate fever cough headache
//!   symtriage evaluate --text "I have a fever and I'm throwing up" --json
//!   symtriage emergency "my chest hurts and I can't breathe"
//!   symtriage feedback "the nurse was friendly" --kind appointment
//!   symtriage analytics

mod config;
mod render;

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use symtriage_audit::{load_verified, AnalyticsLog, FileAnalyticsLog};
use symtriage_contracts::{analysis::AnalysisResult, error::TriageError, symptom::SymptomSet};
use symtriage_core::TriageService;
use symtriage_rules::{RuleTable, RuleTableMatcher, SymptomCatalog};
use symtriage_signals::{analyze_feedback, assess, FeedbackKind};

use crate::config::{AnalyticsSection, TriageConfig};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Symptom-to-condition matcher with emergency and feedback triage.
#[derive(Debug, Parser)]
#[command(
    name = "symtriage",
    version,
    about = "Symptom triage: condition matching, emergency levels, feedback sentiment"
)]
struct Cli {
    /// Configuration file. Defaults to ./symtriage.toml when present.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Custom condition rule table, overriding the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    rules: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the symptom catalog.
    Symptoms {
        /// Only show symptoms whose name contains this term.
        #[arg(long)]
        search: Option<String>,
    },
    /// Match a set of symptoms to the best-explaining condition.
    Evaluate {
        /// Symptom identifiers, e.g. `fever sore_throat`.
        #[arg(required_unless_present = "text", conflicts_with = "text")]
        ids: Vec<String>,

        /// Describe symptoms in free text instead of listing identifiers.
        #[arg(long)]
        text: Option<String>,
    },
    /// Classify how urgent a patient message sounds.
    Emergency {
        message: String,
    },
    /// Analyse patient feedback sentiment.
    Feedback {
        text: String,

        #[arg(long, value_enum, default_value_t = KindArg::General)]
        kind: KindArg,
    },
    /// Verify the analytics log and summarise what it holds.
    Analytics {
        /// Log file to check instead of the configured `[analytics] path`.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Appointment,
    Chat,
    General,
}

impl From<KindArg> for FeedbackKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Appointment => FeedbackKind::Appointment,
            KindArg::Chat => FeedbackKind::Chat,
            KindArg::General => FeedbackKind::General,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Triage(#[from] TriageError),

    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let config = match TriageConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.logging.filter.as_deref());

    if let Err(e) = run(cli, &config) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins, then the configured filter, then `warn`.
fn init_tracing(configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| match configured {
            Some(directive) => EnvFilter::try_new(directive),
            None => Ok(EnvFilter::new("warn")),
        })
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli, config: &TriageConfig) -> Result<(), CliError> {
    match cli.command {
        Command::Symptoms { search } => list_symptoms(search.as_deref(), cli.json),
        Command::Evaluate { ids, text } => {
            let rules = cli.rules.or_else(|| config.rules.path.clone());
            let input = match &text {
                Some(text) => Input::Text(text),
                None => Input::Ids(&ids),
            };
            evaluate(input, rules.as_deref(), &config.analytics, cli.json)
        }
        Command::Emergency { message } => {
            let assessment = assess(&message);
            if cli.json {
                print_json(&assessment)
            } else {
                print!("{}", render::Emergency(&assessment));
                Ok(())
            }
        }
        Command::Feedback { text, kind } => {
            let report = analyze_feedback(&text, kind.into());
            if cli.json {
                print_json(&report)
            } else {
                print!("{}", render::Feedback(&report));
                Ok(())
            }
        }
        Command::Analytics { file } => {
            let path = file.or_else(|| config.analytics.path.clone());
            let log = summarize_analytics(path.as_deref(), &config.analytics.stream_id)?;
            if cli.json {
                print_json(&log)
            } else {
                print!("{}", render::Analytics(&log));
                Ok(())
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── symptoms ──────────────────────────────────────────────────────────────────

fn list_symptoms(search: Option<&str>, json: bool) -> Result<(), CliError> {
    let catalog = SymptomCatalog::builtin();
    let found = catalog.search(search.unwrap_or(""));
    if json {
        print_json(&found)
    } else {
        print!("{}", render::SymptomList(&found));
        Ok(())
    }
}

// ── evaluate ──────────────────────────────────────────────────────────────────

enum Input<'a> {
    Ids(&'a [String]),
    Text(&'a str),
}

#[derive(Serialize)]
struct EvaluationReport<'a> {
    symptoms: Vec<&'a str>,
    result: &'a AnalysisResult,
}

/// Resolve `input` against the catalog, returning the symptom set and the
/// display names of the symptoms that were recognised.
fn resolve_input(catalog: &SymptomCatalog, input: Input<'_>) -> (SymptomSet, Vec<String>) {
    let set: SymptomSet = match input {
        Input::Ids(ids) => ids.iter().map(String::as_str).collect(),
        Input::Text(text) => catalog.extract_from_text(text),
    };

    for id in set.iter().filter(|id| !catalog.contains(id)) {
        warn!(symptom = %id, "unknown symptom identifier ignored");
    }

    let recognized = set
        .iter()
        .filter_map(|id| catalog.get(id))
        .map(|s| s.display_name.clone())
        .collect();
    (set, recognized)
}

/// The analytics sink configured for this run, if any.
fn open_sink(analytics: &AnalyticsSection) -> Result<Option<FileAnalyticsLog>, CliError> {
    match (&analytics.path, analytics.enabled) {
        (Some(path), true) => Ok(Some(FileAnalyticsLog::open(
            path,
            analytics.stream_id.clone(),
        )?)),
        (None, true) => {
            debug!("no analytics path configured; evaluations are not recorded");
            Ok(None)
        }
        (_, false) => Ok(None),
    }
}

fn build_service(
    rules: Option<&Path>,
    analytics: &AnalyticsSection,
) -> Result<(TriageService, SymptomCatalog), CliError> {
    let catalog = SymptomCatalog::builtin();
    let table = match rules {
        Some(path) => RuleTable::from_file(path, &catalog)?,
        None => RuleTable::builtin(),
    };

    let mut service = TriageService::new(Box::new(RuleTableMatcher::new(catalog.clone(), table)));
    if let Some(sink) = open_sink(analytics)? {
        service = service.with_sink(Box::new(sink));
    }
    Ok((service, catalog))
}

fn evaluate(
    input: Input<'_>,
    rules: Option<&Path>,
    analytics: &AnalyticsSection,
    json: bool,
) -> Result<(), CliError> {
    let (service, catalog) = build_service(rules, analytics)?;
    let (symptoms, recognized) = resolve_input(&catalog, input);
    let result = service.evaluate(&symptoms);

    if json {
        let known = catalog.normalize(&symptoms);
        print_json(&EvaluationReport {
            symptoms: known.iter().map(|id| id.as_str()).collect(),
            result: &result,
        })
    } else {
        print!(
            "{}",
            render::Evaluation {
                recognized: &recognized,
                result: &result,
            }
        );
        Ok(())
    }
}

// ── analytics ─────────────────────────────────────────────────────────────────

/// Load and verify the log at `path`. A broken chain is an error.
fn summarize_analytics(path: Option<&Path>, stream_id: &str) -> Result<AnalyticsLog, CliError> {
    let path = path.ok_or_else(|| TriageError::ConfigError {
        reason: "no analytics log configured; set [analytics] path or pass --file".to_string(),
    })?;
    let events = load_verified(path)?;
    Ok(AnalyticsLog::new(
        stream_id.to_string(),
        events,
        Utc::now(),
    ))
}

#[cfg(test)]
mod tests {
    use symtriage_contracts::analysis::MatchKind;

    use super::*;

    // ── 1. Argument parsing ───────────────────────────────────────────────────

    #[test]
    fn evaluate_accepts_ids() {
        let cli = Cli::try_parse_from(["symtriage", "evaluate", "fever", "cough"]).unwrap();
        match cli.command {
            Command::Evaluate { ids, text } => {
                assert_eq!(ids, vec!["fever", "cough"]);
                assert!(text.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn evaluate_requires_ids_or_text() {
        assert!(Cli::try_parse_from(["symtriage", "evaluate"]).is_err());
        assert!(Cli::try_parse_from(["symtriage", "evaluate", "fever", "--text", "fever"]).is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "symtriage",
            "evaluate",
            "--text",
            "I feel dizzy",
            "--json",
            "--rules",
            "custom.toml",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.rules, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn feedback_kind_defaults_to_general() {
        let cli = Cli::try_parse_from(["symtriage", "feedback", "great visit"]).unwrap();
        match cli.command {
            Command::Feedback { kind, .. } => assert_eq!(kind, KindArg::General),
            other => panic!("unexpected command {:?}", other),
        }

        let cli =
            Cli::try_parse_from(["symtriage", "feedback", "great visit", "--kind", "appointment"])
                .unwrap();
        match cli.command {
            Command::Feedback { kind, .. } => {
                assert_eq!(FeedbackKind::from(kind), FeedbackKind::Appointment)
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    // ── 2. Evaluation wiring ──────────────────────────────────────────────────

    #[test]
    fn resolve_input_drops_unknown_ids_from_display() {
        let catalog = SymptomCatalog::builtin();
        let ids = vec!["fever".to_string(), "glowing".to_string()];
        let (set, recognized) = resolve_input(&catalog, Input::Ids(&ids));
        assert_eq!(set.len(), 2);
        assert_eq!(recognized, vec!["Fever"]);
    }

    #[test]
    fn resolve_input_from_text() {
        let catalog = SymptomCatalog::builtin();
        let (set, _) = resolve_input(&catalog, Input::Text("Nausea, vomiting and diarrhea"));
        let ids = set.to_strings();
        assert_eq!(ids, vec!["diarrhea", "nausea", "vomiting"]);
    }

    fn scratch_log(name: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("symtriage-cli-{}", std::process::id()))
            .join(format!("{}.jsonl", name));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn analytics_at(path: &Path) -> AnalyticsSection {
        AnalyticsSection {
            path: Some(path.to_path_buf()),
            ..AnalyticsSection::default()
        }
    }

    #[test]
    fn evaluations_persist_across_runs() {
        let path = scratch_log("persist");

        for ids in [["nausea", "vomiting", "diarrhea"], ["fever", "headache", "cough"]] {
            let (service, _) = build_service(None, &analytics_at(&path)).unwrap();
            service.evaluate_ids(ids);
        }

        let log = summarize_analytics(Some(path.as_path()), "cli").unwrap();
        assert_eq!(log.events.len(), 2);
        assert_eq!(log.events[0].record.condition, "Gastroenteritis (Stomach Flu)");
        assert_eq!(log.events[1].sequence, 1);
        assert_eq!(log.terminal_hash, log.events[1].this_hash);
    }

    #[test]
    fn result_is_unchanged_by_recording() {
        let path = scratch_log("unchanged");
        let (recorded, _) = build_service(None, &analytics_at(&path)).unwrap();
        let (plain, _) = build_service(None, &AnalyticsSection::default()).unwrap();

        let a = recorded.evaluate_ids(["nausea", "vomiting", "diarrhea"]);
        let b = plain.evaluate_ids(["nausea", "vomiting", "diarrhea"]);
        assert_eq!(a, b);
        assert_eq!(a.match_kind, MatchKind::Exact);
    }

    #[test]
    fn nothing_is_written_when_disabled() {
        let path = scratch_log("disabled");
        let analytics = AnalyticsSection {
            enabled: false,
            ..analytics_at(&path)
        };
        let (service, _) = build_service(None, &analytics).unwrap();
        service.evaluate_ids(["rash", "joint_pain"]);
        assert!(!path.exists());
        assert!(open_sink(&AnalyticsSection::default()).unwrap().is_none());
    }

    #[test]
    fn analytics_summary_needs_a_path() {
        let err = summarize_analytics(None, "cli").err().expect("no path configured");
        assert!(err.to_string().contains("no analytics log configured"));
    }

    #[test]
    fn analytics_subcommand_takes_file() {
        let cli = Cli::try_parse_from(["symtriage", "analytics", "--file", "a.jsonl"]).unwrap();
        match cli.command {
            Command::Analytics { file } => assert_eq!(file, Some(PathBuf::from("a.jsonl"))),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn missing_rules_file_is_a_config_error() {
        let err = build_service(
            Some(Path::new("/nonexistent/rules.toml")),
            &AnalyticsSection::default(),
        )
        .err()
        .expect("loading must fail");
        assert!(matches!(
            err,
            CliError::Triage(TriageError::ConfigError { .. })
        ));
    }
}
