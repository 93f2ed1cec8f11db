use std::{fmt, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where the currently resolvable registry data lives. Describes persisted
/// state, never the outcome of the last fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Cache,
    LocalFile,
    NotLoaded,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Cache => "cache",
            Provenance::LocalFile => "local_file",
            Provenance::NotLoaded => "not_loaded",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only snapshot produced by `RegistryResolver::status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryStatus {
    pub source: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub cache_path: PathBuf,
    pub cache_exists: bool,
    pub cache_mtime: Option<DateTime<Utc>>,
    pub tool_count: usize,
    pub provenance: Provenance,
}
