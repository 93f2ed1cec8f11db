//! Tool registry acquisition: a disk cache keyed by (source, ref), a fetcher
//! seam for remote catalogs, and the resolver that decides between them.

mod cache;
mod config;
mod fetch;
mod model;
mod resolver;
pub mod search;
mod status;

pub use cache::{CacheInspection, CacheStore, REGISTRY_FILENAME};
pub use config::{DEFAULT_REF, DEFAULT_REGISTRY_SOURCE, RegistryConfig};
pub use fetch::{DEFAULT_FETCH_TIMEOUT, FetchError, HttpFetcher, RegistryFetcher};
pub use model::{InstallSpec, RegistryDocument, ToolDefaults, ToolEntry};
pub use resolver::{Origin, RegistryResolver, Resolution};
pub use status::{Provenance, RegistryStatus};

use std::{io, path::PathBuf};

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No registry could be obtained: the fetch failed and there was nothing
    /// cached to fall back on.
    #[error(
        "failed to fetch registry from {url}: {cause}\n\
         No cached registry available. Check your network connection."
    )]
    FetchFailed {
        url: String,
        cause: String,
        cached_available: bool,
    },
    #[error("invalid registry source '{value}': {reason}")]
    InvalidSource { value: String, reason: String },
    #[error("local registry {path:?} is not a valid registry document: {source}")]
    LocalParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("registry JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RegistryError {
    /// True for the "nothing cached and the network is unreachable" case.
    pub fn is_offline(&self) -> bool {
        matches!(
            self,
            RegistryError::FetchFailed {
                cached_available: false,
                ..
            }
        )
    }
}

pub(crate) fn io_error(path: impl Into<PathBuf>, err: io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.into(),
        source: err,
    }
}
