//! Per-project `mcp.yaml` manifest: which registry a workspace pins and which
//! tools it depends on.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use mcpt_registry::RegistryConfig;
use serde::{Deserialize, Deserializer, Serialize};

pub const MCP_YAML_FILENAME: &str = "mcp.yaml";

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("{0:?} not found")]
    NotFound(PathBuf),
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid workspace config {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

fn io_error(path: &Path, err: io::Error) -> WorkspaceError {
    if err.kind() == ErrorKind::NotFound {
        WorkspaceError::NotFound(path.to_path_buf())
    } else {
        WorkspaceError::Io {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<RegistrySection>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tools: Vec<ToolRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<RunSection>,
    /// Top-level keys this tool does not interpret; written back unchanged.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSection {
    #[serde(default = "default_true")]
    pub safe_by_default: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

fn default_true() -> bool {
    true
}

/// A workspace dependency: either a bare id or an id pinned to a ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolRef {
    Id(String),
    Pinned {
        id: String,
        #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
        git_ref: Option<String>,
    },
}

impl ToolRef {
    pub fn id(&self) -> &str {
        match self {
            ToolRef::Id(id) => id,
            ToolRef::Pinned { id, .. } => id,
        }
    }

    pub fn git_ref(&self) -> Option<&str> {
        match self {
            ToolRef::Id(_) => None,
            ToolRef::Pinned { git_ref, .. } => git_ref.as_deref(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ToolRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ToolRef>>::deserialize(deserializer)?.unwrap_or_default())
}

impl WorkspaceConfig {
    /// Registry settings pinned by this workspace, with defaults for anything
    /// left out.
    pub fn registry_config(&self) -> RegistryConfig {
        let mut cfg = RegistryConfig::default();
        if let Some(section) = &self.registry {
            if let Some(source) = &section.source {
                cfg.source = source.clone();
            }
            if let Some(git_ref) = &section.git_ref {
                cfg.git_ref = git_ref.clone();
            }
        }
        cfg
    }

    pub fn contains(&self, tool_id: &str) -> bool {
        self.tools.iter().any(|t| t.id() == tool_id)
    }
}

/// Starter manifest pinned to `registry`.
pub fn default_yaml(registry: &RegistryConfig) -> String {
    format!(
        "schema_version: \"0.1\"\n\
         name: \"my-mcp-workspace\"\n\
         \n\
         registry:\n  \
           source: \"{}\"\n  \
           ref: \"{}\"\n\
         \n\
         tools: []\n\
         \n\
         run:\n  \
           safe_by_default: true\n",
        registry.source, registry.git_ref
    )
}

pub fn write_default(path: &Path, registry: &RegistryConfig) -> WorkspaceResult<()> {
    fs::write(path, default_yaml(registry)).map_err(|e| io_error(path, e))
}

pub fn read_config(path: &Path) -> WorkspaceResult<WorkspaceConfig> {
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_yaml::from_str(&text).map_err(|source| WorkspaceError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_config(path: &Path, config: &WorkspaceConfig) -> WorkspaceResult<()> {
    let text = serde_yaml::to_string(config).map_err(|source| WorkspaceError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|e| io_error(path, e))
}

/// Add `tool_id` (optionally pinned to `git_ref`) to the manifest at `path`.
///
/// Returns `false` and leaves the file untouched if the id is already listed
/// in either form.
pub fn add_tool(path: &Path, tool_id: &str, git_ref: Option<&str>) -> WorkspaceResult<bool> {
    let mut config = read_config(path)?;
    if config.contains(tool_id) {
        return Ok(false);
    }
    config.tools.push(match git_ref {
        Some(r) => ToolRef::Pinned {
            id: tool_id.to_string(),
            git_ref: Some(r.to_string()),
        },
        None => ToolRef::Id(tool_id.to_string()),
    });
    write_config(path, &config)?;
    tracing::debug!("added {tool_id} to {}", path.display());
    Ok(true)
}

/// Remove every entry for `tool_id`. Returns `false` if none was present.
pub fn remove_tool(path: &Path, tool_id: &str) -> WorkspaceResult<bool> {
    let mut config = read_config(path)?;
    let before = config.tools.len();
    config.tools.retain(|t| t.id() != tool_id);
    if config.tools.len() == before {
        return Ok(false);
    }
    write_config(path, &config)?;
    tracing::debug!("removed {tool_id} from {}", path.display());
    Ok(true)
}
