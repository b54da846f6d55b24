//! # Docrun
//!
//! Run the shell commands embedded in your README, with per-block
//! approval.
//!
//! Docrun scans a project's README for comment-delimited blocks of
//! commands and variable bindings, asks the operator to approve each
//! block once (remembered by content fingerprint, so editing a block
//! re-asks), substitutes `#name` variable references, and executes the
//! commands in document order through the platform shell.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install
//! cargo install docrun
//!
//! # Run the blocks in ./README.md
//! docrun run
//!
//! # Preview without executing
//! docrun run --dry-run
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod app;
pub mod block;
pub mod core;
pub mod prompt;

// Re-export commonly used types
pub use app::App;
pub use block::{fingerprint, scan_blocks, Block, VarValue};
pub use crate::core::{substitute, DocumentRunner, Executor, RunError, RunReport, RunnerState};
pub use prompt::{Prompter, TerminalPrompter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "docrun";
