//! Document scanner.
//!
//! Finds block boundaries in raw README text. A block starts at a line
//! matching `<!-- docrun -->` or `<!-- docrun[Name] -->` and ends at
//! the first later line containing `-->`. Everything outside a block is
//! inert text, including fenced code samples.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{compile_body, Block};

/// End-of-block marker.
const END_MARKER: &str = "-->";

/// Matches a start marker with an optional bracketed name.
static START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--\s*docrun(\[([^\]]+)\])?").unwrap());

/// Scan document text into structured blocks, in document order.
///
/// Malformed input never fails: a new start marker while a block is
/// open closes the previous block implicitly, and end-of-input closes
/// any still-open block with the lines accumulated so far.
pub fn scan_blocks(content: &str) -> Vec<Block> {
    let mut blocks = Vec::new();

    // (name, body lines) of the block currently being collected
    let mut current: Option<(String, Vec<String>)> = None;

    for line in content.lines() {
        if let Some(caps) = START_RE.captures(line) {
            if let Some((name, body)) = current.take() {
                tracing::debug!(block = %name, "block not closed, recovering at next marker");
                blocks.push(compile_body(name, &body));
            }

            let name = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
            current = Some((name, Vec::new()));
            continue;
        }

        let Some((_, body)) = current.as_mut() else {
            // Outside any block; not inspected further.
            continue;
        };

        if line.contains(END_MARKER) {
            // Text before the end marker still belongs to the body.
            let last = line.trim().trim_end_matches(END_MARKER).trim_end();
            if !last.is_empty() {
                body.push(last.to_string());
            }

            if let Some((name, body)) = current.take() {
                blocks.push(compile_body(name, &body));
            }
            continue;
        }

        body.push(line.to_string());
    }

    if let Some((name, body)) = current {
        tracing::debug!(block = %name, "block not closed at end of input, recovering");
        blocks.push(compile_body(name, &body));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::VarValue;

    #[test]
    fn test_named_and_unnamed_blocks() {
        let doc = "\
# Project

<!-- docrun[Setup]
npm install
-->

<!-- docrun
npm test
-->
";
        let blocks = scan_blocks(doc);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name, "Setup");
        assert_eq!(blocks[0].commands, vec!["npm install"]);
        assert_eq!(blocks[1].name, "");
        assert_eq!(blocks[1].commands, vec!["npm test"]);
    }

    #[test]
    fn test_text_outside_blocks_is_ignored() {
        let doc = "\
Some intro text.
npm run this-is-not-a-command

<!-- docrun[Build]
cargo build
-->

More prose after.
";
        let blocks = scan_blocks(doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].commands, vec!["cargo build"]);
    }

    #[test]
    fn test_fenced_code_sample_is_inert() {
        let doc = "\
Usage:

```bash
deploy.sh --help
```

<!-- docrun[Deploy]
deploy.sh
-->
";
        let blocks = scan_blocks(doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "Deploy");
        assert_eq!(blocks[0].commands, vec!["deploy.sh"]);
    }

    #[test]
    fn test_unclosed_block_recovers_at_end_of_input() {
        let doc = "\
<!-- docrun[Oops]
echo one
echo two
";
        let blocks = scan_blocks(doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "Oops");
        assert_eq!(blocks[0].commands, vec!["echo one", "echo two"]);
    }

    #[test]
    fn test_new_marker_closes_previous_block() {
        let doc = "\
<!-- docrun[First]
echo first
<!-- docrun[Second]
echo second
-->
";
        let blocks = scan_blocks(doc);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name, "First");
        assert_eq!(blocks[0].commands, vec!["echo first"]);
        assert_eq!(blocks[1].name, "Second");
        assert_eq!(blocks[1].commands, vec!["echo second"]);
    }

    #[test]
    fn test_end_marker_line_keeps_leading_content() {
        let doc = "<!-- docrun[Tail]\necho done -->\n";
        let blocks = scan_blocks(doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].commands, vec!["echo done"]);
    }

    #[test]
    fn test_name_is_taken_verbatim() {
        let doc = "<!-- docrun[ spaced name ] -->\n";
        let blocks = scan_blocks(doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, " spaced name ");
    }

    #[test]
    fn test_block_with_variables() {
        let doc = "\
<!-- docrun[Deploy]
project = \"site\"
deploy.sh #project
-->
";
        let blocks = scan_blocks(doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].var("project"), Some(&VarValue::Literal("site".into())));
        assert_eq!(blocks[0].commands, vec!["deploy.sh #project"]);
    }
}
