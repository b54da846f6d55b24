//! Block execution engine.
//!
//! Drives the approval gate, prompt resolution, variable substitution,
//! and command execution for the blocks of one document, strictly in
//! document order.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use super::{approval, Executor, RunError};
use crate::block::{fingerprint, Block, VarValue};
use crate::prompt::Prompter;

/// Variable reference inside a command: `#name`.
static VAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([a-zA-Z0-9_-]+)").unwrap());

/// Runner state, per block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerState {
    Ready,
    ResolvingPrompts,
    Executing,
    Completed,
    Skipped,
    Failed(String),
}

/// Outcome of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockOutcome {
    Completed,
    Skipped,
}

/// Counts reported after a run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunReport {
    /// Blocks whose commands all ran
    pub executed: usize,

    /// Blocks the operator declined
    pub skipped: usize,
}

/// Executes the blocks of a document.
pub struct DocumentRunner<'a, P: Prompter> {
    blocks: Vec<Block>,

    /// Low-priority variable layer, typically from a `.env` file
    defaults: HashMap<String, String>,

    /// Directory commands run in; also holds the approval store
    working_dir: PathBuf,

    /// Skip fingerprinting and confirmation entirely
    trust: bool,

    prompter: &'a mut P,
    executor: Executor,
    state: RunnerState,
}

impl<'a, P: Prompter> DocumentRunner<'a, P> {
    pub fn new(
        blocks: Vec<Block>,
        defaults: HashMap<String, String>,
        working_dir: impl Into<PathBuf>,
        prompter: &'a mut P,
    ) -> Self {
        Self {
            blocks,
            defaults,
            working_dir: working_dir.into(),
            trust: false,
            prompter,
            executor: Executor::new(),
            state: RunnerState::Ready,
        }
    }

    /// Auto-approve every block, skipping hashing and confirmation.
    #[must_use]
    pub fn trust(mut self, trust: bool) -> Self {
        self.trust = trust;
        self
    }

    /// Replace the executor (tests capture output).
    #[must_use]
    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    /// State the runner was left in by the last block.
    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    /// Run every block in document order.
    ///
    /// Stops at the first failed command; blocks after a failed one are
    /// never attempted.
    pub fn run(&mut self) -> Result<RunReport, RunError> {
        let approved: HashSet<String> =
            if self.trust { HashSet::new() } else { approval::load(&self.working_dir) };

        let mut report = RunReport::default();
        let blocks = std::mem::take(&mut self.blocks);
        let total = blocks.len();

        for (index, block) in blocks.iter().enumerate() {
            match self.run_block(block, index + 1, total, &approved) {
                Ok(BlockOutcome::Completed) => report.executed += 1,
                Ok(BlockOutcome::Skipped) => report.skipped += 1,
                Err(err) => {
                    self.state = RunnerState::Failed(err.to_string());
                    return Err(err);
                }
            }
        }

        Ok(report)
    }

    fn run_block(
        &mut self,
        block: &Block,
        position: usize,
        total: usize,
        approved: &HashSet<String>,
    ) -> Result<BlockOutcome, RunError> {
        self.state = RunnerState::Ready;

        if !self.trust {
            let digest = fingerprint(block);
            if !approved.contains(&digest) {
                if !self.prompter.confirm_block(block, position, total) {
                    tracing::info!(block = block.label(), "block declined, skipping");
                    self.state = RunnerState::Skipped;
                    return Ok(BlockOutcome::Skipped);
                }
                approval::record(&self.working_dir, &digest);
            }
        }

        self.state = RunnerState::ResolvingPrompts;
        let resolved = self.resolve_variables(block)?;

        // Block variables overlay the external defaults.
        let mut vars = self.defaults.clone();
        vars.extend(resolved);

        self.state = RunnerState::Executing;
        for command in &block.commands {
            let command = substitute(command, &vars);

            if block.name.is_empty() {
                println!("\nExecuting: {command}\nOutput:");
            } else {
                println!("\n[{}]\nExecuting: {command}\nOutput:", block.name);
            }

            let result = self
                .executor
                .execute(&command, Some(&self.working_dir))
                .map_err(|source| RunError::Spawn {
                    block: block.label().to_string(),
                    command: command.clone(),
                    source,
                })?;

            if !result.success() {
                return Err(RunError::CommandFailed {
                    block: block.label().to_string(),
                    command,
                    status: result.status,
                });
            }
        }

        self.state = RunnerState::Completed;
        Ok(BlockOutcome::Completed)
    }

    /// Resolve every variable to literal text, asking each `#prompt`
    /// question exactly once, before any command of the block runs.
    fn resolve_variables(&mut self, block: &Block) -> Result<HashMap<String, String>, RunError> {
        let mut resolved = HashMap::new();

        for (name, value) in &block.variables {
            let text = match value {
                VarValue::Literal(text) => text.clone(),
                VarValue::Prompt(question) => {
                    self.prompter.ask(question).map_err(|source| RunError::PromptRead {
                        variable: name.clone(),
                        source,
                    })?
                }
            };
            resolved.insert(name.clone(), text);
        }

        Ok(resolved)
    }
}

/// Replace `#name` references with values from the merged mapping.
///
/// Unknown identifiers are left verbatim, leading `#` included, so
/// shell-native uses of `#` outside the declared names pass through.
pub fn substitute(command: &str, vars: &HashMap<String, String>) -> String {
    VAR_RE
        .replace_all(command, |caps: &regex::Captures| {
            vars.get(&caps[1]).cloned().unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

/// Load the low-priority default variables from a `.env` file.
///
/// Uses the explicit path when given, otherwise `.env` in the working
/// directory. A missing or unreadable file yields an empty map.
pub fn load_default_vars(working_dir: &Path, env_path: Option<&Path>) -> HashMap<String, String> {
    let path = match env_path {
        Some(path) => path.to_path_buf(),
        None => working_dir.join(".env"),
    };

    let iter = match dotenvy::from_path_iter(&path) {
        Ok(iter) => iter,
        Err(err) => {
            tracing::debug!(path = ?path, error = %err, "no default variables loaded");
            return HashMap::new();
        }
    };

    iter.filter_map(Result::ok).collect()
}
