//! Block body compiler.
//!
//! Interprets the body lines of a raw block: variable assignments,
//! prompt assignments, and command lines with trailing-backslash
//! continuation.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Block, VarValue};

/// Literal assignment: `name = "value"`.
static ASSIGN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*([a-zA-Z0-9_-]+)\s*=\s*"([^"]+)"\s*$"#).unwrap());

/// Prompt assignment: `name = #prompt("question")`.
static PROMPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*([a-zA-Z0-9_-]+)\s*=\s*#prompt\("([^"]+)"\)\s*$"#).unwrap());

/// Compile raw body lines into a structured block.
///
/// Assignment patterns are checked before the command fallthrough, so a
/// line that fully matches an assignment is never treated as a command.
/// An assignment also terminates any command still being accumulated
/// across continuation lines.
pub fn compile_body(name: String, lines: &[String]) -> Block {
    let mut block = Block::new(name);
    let mut pending = String::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = ASSIGN_RE.captures(line) {
            flush(&mut pending, &mut block.commands);
            block.set_var(&caps[1], VarValue::Literal(caps[2].to_string()));
            continue;
        }

        if let Some(caps) = PROMPT_RE.captures(line) {
            flush(&mut pending, &mut block.commands);
            block.set_var(&caps[1], VarValue::Prompt(caps[2].to_string()));
            continue;
        }

        if !pending.is_empty() {
            pending.push(' ');
        }

        // Trailing backslash continues the command on the next line.
        // Only the backslash is stripped, nothing else is re-trimmed.
        if let Some(fragment) = line.trim_end().strip_suffix('\\') {
            pending.push_str(fragment);
            continue;
        }

        pending.push_str(line);
        flush(&mut pending, &mut block.commands);
    }

    // A body may end mid-command without a closing plain line.
    flush(&mut pending, &mut block.commands);

    block
}

/// Complete the accumulated command, keeping it only if non-empty.
fn flush(pending: &mut String, commands: &mut Vec<String>) {
    if pending.is_empty() {
        return;
    }
    let command = pending.trim().to_string();
    if !command.is_empty() {
        commands.push(command);
    }
    pending.clear();
}
