use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A registry catalog. `tools` is required; any other top-level keys are
/// carried through untouched so a cached copy matches what was fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryDocument {
    pub tools: Vec<ToolEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegistryDocument {
    pub fn new(tools: Vec<ToolEntry>) -> Self {
        Self {
            tools,
            extra: Map::new(),
        }
    }

    /// First entry whose id matches exactly. Duplicate ids are tolerated.
    pub fn find(&self, id: &str) -> Option<&ToolEntry> {
        self.tools.iter().find(|t| t.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolEntry {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "InstallSpec::is_empty"
    )]
    pub install: InstallSpec,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "ToolDefaults::is_default"
    )]
    pub defaults: ToolDefaults,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstallSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ref: Option<String>,
}

impl InstallSpec {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.url.is_none() && self.default_ref.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefaults {
    /// Whether the tool can run without side effects.
    #[serde(default = "default_safe_run", deserialize_with = "null_as_true")]
    pub safe_run: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            safe_run: true,
            extra: Map::new(),
        }
    }
}

impl ToolDefaults {
    pub fn is_default(&self) -> bool {
        self.safe_run && self.extra.is_empty()
    }
}

fn default_safe_run() -> bool {
    true
}

/// Explicit `null` reads the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}
