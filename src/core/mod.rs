//! Core types and functionality for Docrun.
//!
//! This module contains the approval store, the shell executor, and
//! the runner that drives a document's blocks through the approval
//! gate, prompt resolution, substitution, and execution.

pub mod approval;
mod error;
mod executor;
mod runner;

pub use error::RunError;
pub use executor::{ExecutionResult, Executor};
pub use runner::{load_default_vars, substitute, DocumentRunner, RunReport, RunnerState};
