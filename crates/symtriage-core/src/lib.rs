//! # symtriage-core
//!
//! The seams of the symtriage runtime.
//!
//! This crate provides:
//! - The two core traits (`Matcher`, `AnalysisSink`)
//! - The `TriageService` that evaluates a symptom set and records the
//!   outcome without letting the sink affect the result
//!
//! ## Usage
//!
//! ```rust,ignore
//! use symtriage_core::{TriageService, traits::{Matcher, AnalysisSink}};
//! ```

pub mod service;
pub mod traits;

pub use service::TriageService;
