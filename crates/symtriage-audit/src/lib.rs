//! # symtriage-audit
//!
//! Tamper-evident analytics for symptom evaluations.
//!
//! Each `AnalysisRecord` handed to a sink becomes an `AnalyticsEvent` carrying
//! the SHA-256 hash of the event before it. Two sinks share the chain logic:
//!
//! - `FileAnalyticsLog` appends JSON lines to a file and keeps extending the
//!   same chain across process runs. It refuses to open a file whose chain
//!   is broken.
//! - `InMemoryAnalyticsLog` keeps events for the life of the process.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use symtriage_audit::FileAnalyticsLog;
//! use symtriage_core::TriageService;
//! use symtriage_rules::RuleTableMatcher;
//!
//! let log = FileAnalyticsLog::open("analytics.jsonl", "clinic-frontdesk")?;
//! let service = TriageService::new(Box::new(RuleTableMatcher::builtin()))
//!     .with_sink(Box::new(log));
//!
//! service.evaluate_ids(["fever", "cough"]);
//! ```

pub mod chain;
pub mod event;
pub mod file;
pub mod memory;

pub use chain::{first_break, hash_event, verify_chain, ChainHead};
pub use event::{AnalyticsEvent, AnalyticsLog};
pub use file::{load_verified, read_events, FileAnalyticsLog};
pub use memory::InMemoryAnalyticsLog;

// ── Tests ─────────────────────────────────────────────────────────────────────
