//! Block fingerprinting.
//!
//! Derives a stable SHA-256 digest from a block's semantic content so a
//! previously-approved block is recognized across runs, even if its
//! variables were cosmetically reordered in the document.

use sha2::{Digest, Sha256};

use super::{Block, VarValue};

/// Distinguishes a prompt's question text from a literal with the same
/// characters inside the canonical byte string. The tagged [`VarValue`]
/// keeps the two apart everywhere else.
const PROMPT_SENTINEL: &str = "#prompt:";

/// Compute the lowercase-hex fingerprint of a block.
///
/// Canonical form: the name line, then variables sorted by key, then
/// commands in original order. Variable declaration order never
/// affects the result; command order always does.
pub fn fingerprint(block: &Block) -> String {
    let mut canonical = String::new();
    canonical.push_str("name:");
    canonical.push_str(&block.name);
    canonical.push('\n');

    let mut vars: Vec<(&String, &VarValue)> =
        block.variables.iter().map(|(k, v)| (k, v)).collect();
    vars.sort_unstable_by_key(|(key, _)| key.as_str());

    for (key, value) in vars {
        canonical.push_str("var:");
        canonical.push_str(key);
        canonical.push('=');
        match value {
            VarValue::Literal(text) => canonical.push_str(text),
            VarValue::Prompt(question) => {
                canonical.push_str(PROMPT_SENTINEL);
                canonical.push_str(question);
            }
        }
        canonical.push('\n');
    }

    for command in &block.commands {
        canonical.push_str("cmd:");
        canonical.push_str(command);
        canonical.push('\n');
    }

    let digest = Sha256::digest(canonical.as_bytes());
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(name: &str, vars: &[(&str, &str)], commands: &[&str]) -> Block {
        let mut block = Block::new(name);
        for (key, value) in vars {
            block.set_var(*key, VarValue::Literal((*value).to_string()));
        }
        block.commands = commands.iter().map(|c| (*c).to_string()).collect();
        block
    }

    #[test]
    fn test_variable_order_does_not_matter() {
        let first = block("test", &[("a", "1"), ("b", "2")], &["echo test"]);
        let second = block("test", &[("b", "2"), ("a", "1")], &["echo test"]);

        assert_eq!(fingerprint(&first), fingerprint(&second));
    }

    #[test]
    fn test_command_order_matters() {
        let first = block("test", &[], &["echo a", "echo b"]);
        let second = block("test", &[], &["echo b", "echo a"]);

        assert_ne!(fingerprint(&first), fingerprint(&second));
    }

    #[test]
    fn test_name_matters() {
        let first = block("one", &[], &["echo test"]);
        let second = block("two", &[], &["echo test"]);

        assert_ne!(fingerprint(&first), fingerprint(&second));
    }

    #[test]
    fn test_variable_value_matters() {
        let first = block("test", &[("a", "1")], &["echo test"]);
        let second = block("test", &[("a", "2")], &["echo test"]);

        assert_ne!(fingerprint(&first), fingerprint(&second));
    }

    #[test]
    fn test_prompt_question_matters() {
        let mut first = Block::new("test");
        first.set_var("env", VarValue::Prompt("Which env?".into()));
        let mut second = Block::new("test");
        second.set_var("env", VarValue::Prompt("Which stage?".into()));

        assert_ne!(fingerprint(&first), fingerprint(&second));
    }

    #[test]
    fn test_prompt_differs_from_equal_looking_literal() {
        let mut prompted = Block::new("test");
        prompted.set_var("env", VarValue::Prompt("staging".into()));
        let mut literal = Block::new("test");
        literal.set_var("env", VarValue::Literal("staging".into()));

        assert_ne!(fingerprint(&prompted), fingerprint(&literal));
    }

    #[test]
    fn test_empty_block_has_a_digest() {
        let digest = fingerprint(&Block::default());
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_deterministic_across_calls() {
        let b = block("Deploy", &[("project", "site")], &["deploy.sh #project"]);
        assert_eq!(fingerprint(&b), fingerprint(&b));
    }
}
