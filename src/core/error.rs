//! Run error types.

use std::process::ExitStatus;

use thiserror::Error;

/// A failure that aborts the rest of the run.
#[derive(Debug, Error)]
pub enum RunError {
    /// A command exited non-zero.
    #[error("block '{block}': command `{command}` failed with {status}")]
    CommandFailed { block: String, command: String, status: ExitStatus },

    /// A command could not be launched at all.
    #[error("block '{block}': failed to launch `{command}`")]
    Spawn {
        block: String,
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A variable prompt could not be answered, so the block cannot
    /// execute with the variable unresolved.
    #[error("failed to read answer for variable '{variable}'")]
    PromptRead {
        variable: String,
        #[source]
        source: std::io::Error,
    },
}
