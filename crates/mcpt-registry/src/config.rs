use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{RegistryError, RegistryResult};

/// Registry pinned for new workspaces.
pub const DEFAULT_REGISTRY_SOURCE: &str = "https://github.com/mcp-tool-shop-org/mcp-tool-registry";
pub const DEFAULT_REF: &str = "v0.1.0";

const RAW_CONTENT_HOST: &str = "https://raw.githubusercontent.com";

/// Where to obtain the catalog: a local JSON file, or a repository location
/// paired with a ref.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub source: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_REGISTRY_SOURCE.to_string(),
            git_ref: DEFAULT_REF.to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn new(source: impl Into<String>, git_ref: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            git_ref: git_ref.into(),
        }
    }

    /// The source as a filesystem path, if it names an existing regular file.
    pub fn local_path(&self) -> Option<&Path> {
        let path = Path::new(&self.source);
        path.is_file().then_some(path)
    }

    /// Raw-content URL of `registry.json` at `ref` in the source repository.
    ///
    /// The last two path segments of the source are taken as organization and
    /// repository, so both `https://github.com/org/repo` and `org/repo` work.
    pub fn raw_url(&self) -> RegistryResult<String> {
        let mut segments = self
            .source
            .trim_end_matches('/')
            .rsplit('/')
            .filter(|s| !s.is_empty());
        let (repo, org) = match (segments.next(), segments.next()) {
            (Some(repo), Some(org)) => (repo.trim_end_matches(".git"), org),
            _ => {
                return Err(RegistryError::InvalidSource {
                    value: self.source.clone(),
                    reason: "expected an <org>/<repo> location or a local file".into(),
                });
            }
        };
        if self.git_ref.is_empty() {
            return Err(RegistryError::InvalidSource {
                value: self.source.clone(),
                reason: "registry ref must not be empty".into(),
            });
        }
        Ok(format!(
            "{RAW_CONTENT_HOST}/{org}/{repo}/{}/{}",
            self.git_ref,
            crate::REGISTRY_FILENAME
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_url_uses_last_two_segments() {
        let cfg = RegistryConfig::new("https://github.com/mcp-tool-shop-org/mcp-tool-registry/", "v0.2.0");
        assert_eq!(
            cfg.raw_url().unwrap(),
            "https://raw.githubusercontent.com/mcp-tool-shop-org/mcp-tool-registry/v0.2.0/registry.json"
        );

        let short = RegistryConfig::new("acme/tools.git", "main");
        assert_eq!(
            short.raw_url().unwrap(),
            "https://raw.githubusercontent.com/acme/tools/main/registry.json"
        );
    }

    #[test]
    fn raw_url_rejects_single_segment() {
        let cfg = RegistryConfig::new("registry", "main");
        let err = cfg.raw_url().expect_err("single segment");
        assert!(matches!(err, RegistryError::InvalidSource { .. }));
    }

    #[test]
    fn local_path_only_for_existing_files() {
        let dir = tempfile::TempDir::new().expect("tmp");
        let file = dir.path().join("registry.json");
        std::fs::write(&file, "{\"tools\": []}").expect("write");

        let cfg = RegistryConfig::new(file.to_string_lossy(), "main");
        assert_eq!(cfg.local_path(), Some(file.as_path()));

        let as_dir = RegistryConfig::new(dir.path().to_string_lossy(), "main");
        assert!(as_dir.local_path().is_none());
        assert!(RegistryConfig::default().local_path().is_none());
    }
}
