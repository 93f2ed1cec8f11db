use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    CacheStore, FetchError, HttpFetcher, Provenance, RegistryConfig, RegistryDocument,
    RegistryError, RegistryFetcher, RegistryResult, RegistryStatus, ToolEntry, io_error, search,
};

/// How the document returned by a single resolve was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Served from a valid cache entry without touching the network.
    Cache,
    /// Freshly fetched and written back to the cache.
    Remote,
    /// Read from the configured local file; the cache was not written.
    LocalFile,
    /// The fetch failed and a previously cached copy was served instead.
    StaleCache,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub document: RegistryDocument,
    pub origin: Origin,
}

/// Decides per request between cached data, a fresh fetch, and degrading to
/// stale cached data when the fetch fails.
#[derive(Debug)]
pub struct RegistryResolver<F = HttpFetcher> {
    cache: CacheStore,
    fetcher: F,
}

impl<F: RegistryFetcher> RegistryResolver<F> {
    pub fn new(cache: CacheStore, fetcher: F) -> Self {
        Self { cache, fetcher }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Resolve the registry for `cfg`, preferring the cache unless
    /// `force_refresh` is set.
    pub fn resolve(
        &self,
        cfg: &RegistryConfig,
        force_refresh: bool,
    ) -> RegistryResult<RegistryDocument> {
        self.resolve_with_origin(cfg, force_refresh)
            .map(|r| r.document)
    }

    /// Like [`resolve`](Self::resolve) but also reports where the document
    /// came from.
    ///
    /// The cache is always consulted first so a fallback is ready. A fetch
    /// failure degrades to that fallback; only when there is none does it
    /// surface as [`RegistryError::FetchFailed`]. Errors reading an explicit
    /// local-file source propagate unchanged.
    pub fn resolve_with_origin(
        &self,
        cfg: &RegistryConfig,
        force_refresh: bool,
    ) -> RegistryResult<Resolution> {
        let cached = match (force_refresh, self.cache.load(cfg)) {
            (false, Some(document)) => {
                tracing::debug!(
                    "registry {}@{} served from cache",
                    cfg.source,
                    cfg.git_ref
                );
                return Ok(Resolution {
                    document,
                    origin: Origin::Cache,
                });
            }
            (_, cached) => cached,
        };

        if let Some(path) = cfg.local_path() {
            let document = load_local(path)?;
            tracing::debug!("registry loaded from local file {}", path.display());
            return Ok(Resolution {
                document,
                origin: Origin::LocalFile,
            });
        }

        let url = cfg.raw_url()?;
        match self.fetch_document(&url) {
            Ok(document) => {
                if let Err(err) = self.cache.save(cfg, &document) {
                    tracing::warn!("fetched registry could not be cached: {err}");
                }
                tracing::info!("fetched {} tools from {url}", document.tools.len());
                Ok(Resolution {
                    document,
                    origin: Origin::Remote,
                })
            }
            Err(err) => match cached {
                Some(document) => {
                    tracing::warn!("registry fetch from {url} failed ({err}); using cached copy");
                    Ok(Resolution {
                        document,
                        origin: Origin::StaleCache,
                    })
                }
                None => Err(RegistryError::FetchFailed {
                    url,
                    cause: err.to_string(),
                    cached_available: false,
                }),
            },
        }
    }

    /// Snapshot of persisted registry state for `cfg`.
    ///
    /// Performs no network access and never modifies the cache, even when the
    /// cache file is malformed.
    pub fn status(&self, cfg: &RegistryConfig) -> RegistryStatus {
        let seen = self.cache.inspect(cfg);
        let provenance = if cfg.local_path().is_some() {
            Provenance::LocalFile
        } else if seen.tool_count.is_some() {
            Provenance::Cache
        } else {
            Provenance::NotLoaded
        };
        RegistryStatus {
            source: cfg.source.clone(),
            git_ref: cfg.git_ref.clone(),
            cache_path: seen.path,
            cache_exists: seen.exists,
            cache_mtime: seen.modified.map(DateTime::<Utc>::from),
            tool_count: seen.tool_count.unwrap_or(0),
            provenance,
        }
    }

    /// First tool whose id matches `id` exactly, or `None`.
    pub fn get_tool(&self, id: &str, cfg: &RegistryConfig) -> RegistryResult<Option<ToolEntry>> {
        let document = self.resolve(cfg, false)?;
        Ok(document.find(id).cloned())
    }

    /// Tools matching `query`, in registry order.
    pub fn search(&self, query: &str, cfg: &RegistryConfig) -> RegistryResult<Vec<ToolEntry>> {
        let document = self.resolve(cfg, false)?;
        Ok(search::search_tools(&document, query)
            .into_iter()
            .cloned()
            .collect())
    }

    fn fetch_document(&self, url: &str) -> Result<RegistryDocument, FetchError> {
        let body = self.fetcher.fetch(url)?;
        serde_json::from_str(&body).map_err(|e| FetchError::Body(e.to_string()))
    }
}

fn load_local(path: &Path) -> RegistryResult<RegistryDocument> {
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    serde_json::from_slice(&bytes).map_err(|source| RegistryError::LocalParse {
        path: path.to_path_buf(),
        source,
    })
}
