use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Signals extracted from a single file. Lines are stored trimmed and
/// verbatim; this is a heuristic scan, not a parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSignals {
    /// Lines that look like KEY=VALUE assignments.
    pub env_assignments: Vec<String>,
    /// Lines that mention a port together with at least one digit.
    pub port_references: Vec<String>,
    /// Canonical names of frameworks whose marker occurs in the file.
    pub frameworks: BTreeSet<String>,
}

impl FileSignals {
    pub fn is_empty(&self) -> bool {
        self.env_assignments.is_empty()
            && self.port_references.is_empty()
            && self.frameworks.is_empty()
    }
}

/// Row written to the durable store for every scanned file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRecord {
    pub repo_id: u64,
    /// Path relative to the repository root.
    pub file_name: String,
    pub signals: FileSignals,
}

impl SignalRecord {
    pub fn new(repo_id: u64, file_name: impl Into<String>, signals: FileSignals) -> Self {
        Self {
            repo_id,
            file_name: file_name.into(),
            signals,
        }
    }
}
