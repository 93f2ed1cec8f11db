//! Global CLI options and registry/workspace resolution.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use mcpt_registry::{
    CacheStore, DEFAULT_FETCH_TIMEOUT, HttpFetcher, RegistryConfig, RegistryResolver,
};
use mcpt_workspace::{MCP_YAML_FILENAME, WorkspaceError};

/// Global options for CLI commands.
///
/// These options apply to all commands and can be set via env vars.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Registry source: GitHub URL, org/repo, or a local JSON file (env: MCPT_REGISTRY_SOURCE)
    #[arg(long, global = true, env = "MCPT_REGISTRY_SOURCE")]
    pub registry_source: Option<String>,

    /// Registry git ref (env: MCPT_REGISTRY_REF)
    #[arg(long, global = true, env = "MCPT_REGISTRY_REF")]
    pub registry_ref: Option<String>,

    /// Cache root (env: MCPT_CACHE_DIR, default: <user cache dir>/mcpt)
    #[arg(long, global = true, env = "MCPT_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Registry fetch timeout in milliseconds (env: MCPT_TIMEOUT_MS)
    #[arg(long, global = true, env = "MCPT_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Workspace manifest path (env: MCPT_WORKSPACE, default: ./mcp.yaml)
    #[arg(short = 'p', long, global = true, env = "MCPT_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// JSON output envelope
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output (implies --json)
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Suppress notices
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

impl GlobalOpts {
    pub fn wants_json(&self) -> bool {
        self.json || self.pretty
    }

    /// Manifest path; a directory argument means `<dir>/mcp.yaml`.
    pub fn workspace_path(&self) -> PathBuf {
        match &self.workspace {
            Some(path) if path.is_dir() => path.join(MCP_YAML_FILENAME),
            Some(path) => path.clone(),
            None => PathBuf::from(MCP_YAML_FILENAME),
        }
    }

    /// Registry selected by flags/env only, ignoring any workspace manifest.
    pub fn explicit_registry(&self) -> RegistryConfig {
        self.apply_overrides(RegistryConfig::default())
    }

    /// Effective registry: flags/env win over the workspace manifest's
    /// `registry` section, which wins over the built-in defaults.
    pub fn registry_config(&self) -> RegistryConfig {
        let path = self.workspace_path();
        let base = match mcpt_workspace::read_config(&path) {
            Ok(ws) => ws.registry_config(),
            Err(WorkspaceError::NotFound(_)) => RegistryConfig::default(),
            Err(err) => {
                tracing::warn!("ignoring workspace registry settings: {err}");
                RegistryConfig::default()
            }
        };
        self.apply_overrides(base)
    }

    fn apply_overrides(&self, mut cfg: RegistryConfig) -> RegistryConfig {
        if let Some(source) = &self.registry_source {
            cfg.source = source.clone();
        }
        if let Some(git_ref) = &self.registry_ref {
            cfg.git_ref = git_ref.clone();
        }
        cfg
    }

    pub fn cache_store(&self) -> Result<CacheStore> {
        let root = match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir()
                .map(|dir| dir.join("mcpt"))
                .context("no user cache directory; pass --cache-dir or set MCPT_CACHE_DIR")?,
        };
        Ok(CacheStore::new(root))
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn resolver(&self) -> Result<RegistryResolver> {
        let fetcher =
            HttpFetcher::with_timeout(self.fetch_timeout()).context("build HTTP client")?;
        Ok(RegistryResolver::new(self.cache_store()?, fetcher))
    }
}
