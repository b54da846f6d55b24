//! Document block extraction.
//!
//! A README can embed runnable blocks inside HTML-style comment markers.
//! This module turns raw document text into structured [`Block`]s:
//! the scanner finds block boundaries, the compiler interprets body
//! lines, and the fingerprinter derives a stable digest for the
//! approval cache.

mod compiler;
mod fingerprint;
mod scanner;

pub use compiler::compile_body;
pub use fingerprint::fingerprint;
pub use scanner::scan_blocks;

use serde::{Deserialize, Serialize};

/// The value bound to a block variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarValue {
    /// A literal string, declared as `name = "value"`.
    Literal(String),

    /// A value obtained interactively at execution time, declared as
    /// `name = #prompt("question")`. Holds the question text.
    Prompt(String),
}

impl VarValue {
    /// Render the value the way it appears in a block body.
    pub fn display(&self) -> String {
        match self {
            VarValue::Literal(value) => format!("\"{value}\""),
            VarValue::Prompt(question) => format!("#prompt(\"{question}\")"),
        }
    }
}

/// A runnable block extracted from the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Display label from the start marker (empty = unnamed)
    pub name: String,

    /// Variable bindings in declaration order. Keys are unique; the
    /// order is for display only and never affects the fingerprint
    /// or substitution.
    pub variables: Vec<(String, VarValue)>,

    /// Shell command lines, pre-substitution, in execution order.
    /// An empty sequence is a valid no-op block.
    pub commands: Vec<String>,
}

impl Block {
    /// Create an empty block with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), variables: Vec::new(), commands: Vec::new() }
    }

    /// Look up a variable by name.
    pub fn var(&self, name: &str) -> Option<&VarValue> {
        self.variables.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Bind a variable, replacing any existing binding in place so
    /// declaration order stays stable.
    pub fn set_var(&mut self, name: impl Into<String>, value: VarValue) {
        let name = name.into();
        if let Some(slot) = self.variables.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.variables.push((name, value));
        }
    }

    /// A short label for messages: the name, or the first command for
    /// unnamed blocks.
    pub fn label(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        self.commands.first().map(String::as_str).unwrap_or("(empty block)")
    }
}
