//! Approval cache persistence.
//!
//! Fingerprints the user has accepted are stored one per line in a
//! `.docrun` file at the project root. The store is append-only and
//! deliberately lossy-safe: a missing or unreadable file means nothing
//! is approved, and a failed write only means the block will be
//! confirmed again on the next run.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Store filename, relative to the working directory.
pub const STORE_FILE: &str = ".docrun";

/// Path of the approval store for a working directory.
pub fn store_path(dir: &Path) -> PathBuf {
    dir.join(STORE_FILE)
}

/// Load the set of approved fingerprints for a working directory.
///
/// Never fails: an absent or unreadable store yields an empty set.
pub fn load(dir: &Path) -> HashSet<String> {
    let path = store_path(dir);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            tracing::debug!(path = ?path, error = %err, "approval store not readable");
            return HashSet::new();
        }
    };

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Record an approved fingerprint, idempotently.
///
/// Re-recording a known fingerprint writes nothing; write failures are
/// absorbed so a read-only checkout never aborts a run.
pub fn record(dir: &Path, digest: &str) {
    if load(dir).contains(digest) {
        return;
    }

    let path = store_path(dir);
    let result = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&path)
        .and_then(|mut file| writeln!(file, "{digest}"));

    if let Err(err) = result {
        tracing::debug!(path = ?path, error = %err, "failed to persist approval");
    }
}
