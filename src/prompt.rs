//! Interactive prompts.
//!
//! The runner talks to the operator through the [`Prompter`] trait:
//! once to confirm a not-yet-approved block, and once per `#prompt`
//! variable to obtain its value. [`TerminalPrompter`] is the stdin
//! implementation; tests substitute a scripted one.

use std::io::{self, BufRead, Write};

use crate::block::Block;

/// Operator interaction seam.
pub trait Prompter {
    /// Show a block and ask whether to execute it.
    ///
    /// Only "y"/"yes" (case-insensitive) is affirmative; any other
    /// answer, including a failed read, declines.
    fn confirm_block(&mut self, block: &Block, position: usize, total: usize) -> bool;

    /// Ask a free-form question, returning one line of input with
    /// surrounding whitespace trimmed.
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Prompter backed by the terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm_block(&mut self, block: &Block, position: usize, total: usize) -> bool {
        for line in render_summary(block, position, total) {
            println!("{line}");
        }

        print!("\nExecute this block? (y/n): ");
        let _ = io::stdout().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        println!();

        is_affirmative(&answer)
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        print!("\n{question} ");
        io::stdout().flush()?;

        let mut answer = String::new();
        let read = io::stdin().lock().read_line(&mut answer)?;
        if read == 0 {
            // EOF: the variable cannot be resolved.
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(answer.trim().to_string())
    }
}

/// Whether an answer counts as a yes.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// The lines shown when asking for confirmation.
pub fn render_summary(block: &Block, position: usize, total: usize) -> Vec<String> {
    let mut lines = vec![format!("\n--- Block {position} of {total} ---")];

    if block.name.is_empty() {
        if let Some(first) = block.commands.first() {
            lines.push(format!("Command: {}", truncate(first, 50)));
        }
    } else {
        lines.push(format!("Block Name: {}", block.name));
    }

    if !block.commands.is_empty() {
        lines.push("Commands to execute:".to_string());
        for (i, command) in block.commands.iter().enumerate() {
            lines.push(format!("  {}. {command}", i + 1));
        }
    }

    if !block.variables.is_empty() {
        lines.push("Variables:".to_string());
        for (name, value) in &block.variables {
            lines.push(format!("  {name} = {}", value.display()));
        }
    }

    lines
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max).collect();
        format!("{prefix}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::VarValue;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Y"));
        assert!(is_affirmative("yes"));
        assert!(is_affirmative(" YES \n"));

        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("yeah"));
    }

    #[test]
    fn test_summary_shows_name_and_variables() {
        let mut block = Block::new("Deploy");
        block.set_var("project", VarValue::Literal("site".into()));
        block.set_var("env", VarValue::Prompt("Which env?".into()));
        block.commands.push("deploy.sh #project".into());

        let lines = render_summary(&block, 1, 2).join("\n");
        assert!(lines.contains("Block 1 of 2"));
        assert!(lines.contains("Block Name: Deploy"));
        assert!(lines.contains("1. deploy.sh #project"));
        assert!(lines.contains("project = \"site\""));
        assert!(lines.contains("env = #prompt(\"Which env?\")"));
    }

    #[test]
    fn test_summary_unnamed_block_shows_first_command() {
        let mut block = Block::new("");
        block.commands.push("npm install".into());

        let lines = render_summary(&block, 1, 1).join("\n");
        assert!(lines.contains("Command: npm install"));
        assert!(!lines.contains("Block Name"));
    }

    #[test]
    fn test_summary_truncates_long_first_command() {
        let mut block = Block::new("");
        block.commands.push("x".repeat(80));

        let lines = render_summary(&block, 1, 1).join("\n");
        assert!(lines.contains(&format!("Command: {}...", "x".repeat(50))));
    }
}
