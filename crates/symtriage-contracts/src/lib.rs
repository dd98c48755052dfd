//! # symtriage-contracts
//!
//! Shared types, records, and contracts for the symtriage workspace.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod analysis;
pub mod condition;
pub mod error;
pub mod symptom;
