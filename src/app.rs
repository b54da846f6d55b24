//! Application state and document discovery.
//!
//! Locates the README and the `.env` defaults for a working directory
//! and parses the document into blocks. The CLI layer in `main.rs`
//! builds an [`App`] and hands its pieces to the runner.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::block::{scan_blocks, Block};
use crate::core::load_default_vars;

/// README filenames probed in order.
const README_NAMES: &[&str] = &["readme.md", "README.md"];

/// Loaded state for one run.
#[derive(Debug)]
pub struct App {
    /// Working directory: commands run here and the approval store
    /// lives here
    pub working_dir: PathBuf,

    /// The README that was found
    pub readme_path: PathBuf,

    /// Blocks parsed from the README, in document order
    pub blocks: Vec<Block>,

    /// Default variables from the `.env` file (low-priority layer)
    pub defaults: HashMap<String, String>,
}

impl App {
    /// Load the document and defaults for a working directory.
    ///
    /// `path` overrides the current directory; `env_path` overrides the
    /// default `.env` location. A missing README is fatal, a missing
    /// `.env` is not.
    pub fn load(path: Option<&Path>, env_path: Option<&Path>) -> Result<Self> {
        let working_dir = match path {
            Some(path) => path
                .canonicalize()
                .with_context(|| format!("project path does not exist: {}", path.display()))?,
            None => std::env::current_dir().context("failed to determine current directory")?,
        };

        let readme_path = find_readme(&working_dir).with_context(|| {
            format!("no readme found in directory {}", working_dir.display())
        })?;

        let content = std::fs::read_to_string(&readme_path)
            .with_context(|| format!("failed to read {}", readme_path.display()))?;

        let blocks = scan_blocks(&content);
        tracing::debug!(readme = ?readme_path, blocks = blocks.len(), "document parsed");

        let defaults = load_default_vars(&working_dir, env_path);

        Ok(Self { working_dir, readme_path, blocks, defaults })
    }
}

/// Probe for a README in the given directory.
fn find_readme(dir: &Path) -> Option<PathBuf> {
    README_NAMES.iter().map(|name| dir.join(name)).find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_fails_without_readme() {
        let temp = tempdir().unwrap();
        let result = App::load(Some(temp.path()), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_parses_blocks_and_defaults() {
        let temp = tempdir().unwrap();
        std::fs::write(
            temp.path().join("README.md"),
            "# Hi\n<!-- docrun[Setup]\nnpm install\n-->\n",
        )
        .unwrap();
        std::fs::write(temp.path().join(".env"), "REGION=eu\n").unwrap();

        let app = App::load(Some(temp.path()), None).unwrap();
        assert_eq!(app.blocks.len(), 1);
        assert_eq!(app.blocks[0].name, "Setup");
        assert_eq!(app.defaults.get("REGION").map(String::as_str), Some("eu"));
    }

    #[test]
    fn test_lowercase_readme_is_preferred() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("readme.md"), "<!-- docrun\ntrue\n-->\n").unwrap();
        std::fs::write(temp.path().join("README.md"), "no blocks here").unwrap();

        let app = App::load(Some(temp.path()), None).unwrap();
        assert_eq!(app.blocks.len(), 1);
    }
}
