use std::{
    fmt, fs,
    io::{ErrorKind, Write},
    path::PathBuf,
    time::SystemTime,
};

use serde_json::Value;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::{RegistryConfig, RegistryDocument, RegistryResult, io_error};

/// Fixed name of the catalog file, both in the cache and at the repository root.
pub const REGISTRY_FILENAME: &str = "registry.json";

const SOURCE_KEY_LEN: usize = 16;

/// One cached `RegistryDocument` per (source, ref), rooted at
/// `<root>/registry/<source-key>/<ref>/registry.json`.
#[derive(Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore").field("root", &self.root).finish()
    }
}

/// What `inspect` saw on disk. Never produced by a path that deletes.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheInspection {
    pub path: PathBuf,
    pub exists: bool,
    pub modified: Option<SystemTime>,
    /// Number of tools when the file parsed as JSON, `None` otherwise.
    pub tool_count: Option<usize>,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Deterministic cache path for `cfg`. Pure; touches nothing on disk.
    pub fn path_for(&self, cfg: &RegistryConfig) -> PathBuf {
        self.entry_dir(cfg).join(REGISTRY_FILENAME)
    }

    fn entry_dir(&self, cfg: &RegistryConfig) -> PathBuf {
        self.root
            .join("registry")
            .join(source_key(&cfg.source))
            .join(ref_segment(&cfg.git_ref))
    }

    /// Load the cached document for `cfg`.
    ///
    /// Returns `None` when nothing usable is cached. Post-condition: if the
    /// file existed but did not parse as a valid `RegistryDocument`, it has
    /// been deleted, so the next call starts clean. Read failures unrelated to
    /// content (permissions, I/O) also yield `None` but leave the file alone.
    pub fn load(&self, cfg: &RegistryConfig) -> Option<RegistryDocument> {
        let path = self.path_for(cfg);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::debug!("registry cache at {} unreadable: {err}", path.display());
                return None;
            }
        };
        match serde_json::from_slice::<RegistryDocument>(&bytes) {
            Ok(doc) => Some(doc),
            Err(err) => {
                tracing::warn!(
                    "discarding corrupt registry cache at {}: {err}",
                    path.display()
                );
                if let Err(rm) = fs::remove_file(&path) {
                    tracing::debug!("could not remove {}: {rm}", path.display());
                }
                None
            }
        }
    }

    /// Write `doc` for `cfg`, replacing any previous entry.
    ///
    /// The document is written to a temp file beside the target and renamed
    /// into place, so readers see either the old or the new content. Concurrent
    /// writers are not serialized; the last rename wins.
    pub fn save(&self, cfg: &RegistryConfig, doc: &RegistryDocument) -> RegistryResult<()> {
        let parent = self.entry_dir(cfg);
        let path = parent.join(REGISTRY_FILENAME);
        fs::create_dir_all(&parent).map_err(|e| io_error(&parent, e))?;

        let mut json = serde_json::to_string_pretty(doc)?;
        json.push('\n');

        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| io_error(&parent, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| io_error(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| io_error(tmp.path(), e))?;
        tmp.persist(&path).map_err(|e| io_error(&path, e.error))?;
        tracing::info!("saved {} tools to {}", doc.tools.len(), path.display());
        Ok(())
    }

    /// Read-only look at the cache entry for `cfg`: existence, mtime and tool
    /// count if the file parses as JSON. Never deletes, never validates
    /// structure beyond parsing.
    pub fn inspect(&self, cfg: &RegistryConfig) -> CacheInspection {
        let path = self.path_for(cfg);
        let meta = fs::metadata(&path).ok().filter(|m| m.is_file());
        let exists = meta.is_some();
        let modified = meta.and_then(|m| m.modified().ok());
        let tool_count = if exists {
            fs::read(&path)
                .ok()
                .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
                .map(|value| {
                    value
                        .get("tools")
                        .and_then(Value::as_array)
                        .map_or(0, Vec::len)
                })
        } else {
            None
        };
        CacheInspection {
            path,
            exists,
            modified,
            tool_count,
        }
    }
}

fn source_key(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    let mut key = hex::encode(digest);
    key.truncate(SOURCE_KEY_LEN);
    key
}

/// Refs such as `feature/x` must stay a single directory level.
fn ref_segment(git_ref: &str) -> String {
    match git_ref {
        "" | "." | ".." => "_".to_string(),
        other => other.replace(['/', '\\'], "_"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolEntry;
    use tempfile::TempDir;

    fn sample_doc() -> RegistryDocument {
        let mut compass = ToolEntry::new("file-compass");
        compass.name = "File Compass".into();
        compass.tags = vec!["files".into(), "search".into()];
        RegistryDocument::new(vec![compass, ToolEntry::new("voice-soundboard")])
    }

    #[test]
    fn path_for_is_deterministic_and_ref_sensitive() {
        let store = CacheStore::new("/cache/root");
        let a = RegistryConfig::new("acme/tools", "v0.1.0");
        let b = RegistryConfig::new("acme/tools", "v0.2.0");
        assert_eq!(store.path_for(&a), store.path_for(&a.clone()));
        assert_ne!(store.path_for(&a), store.path_for(&b));
        assert!(store.path_for(&a).ends_with("v0.1.0/registry.json"));
        assert!(store.path_for(&a).starts_with("/cache/root/registry"));
    }

    #[test]
    fn path_for_separates_sources_and_flattens_refs() {
        let store = CacheStore::new("/c");
        let a = RegistryConfig::new("acme/tools", "main");
        let b = RegistryConfig::new("other/tools", "main");
        assert_ne!(store.path_for(&a), store.path_for(&b));

        let nested = RegistryConfig::new("acme/tools", "feature/x");
        let parent = store.path_for(&nested);
        assert_eq!(
            parent.parent().unwrap().file_name().unwrap(),
            "feature_x"
        );
        let dotdot = RegistryConfig::new("acme/tools", "..");
        assert!(store.path_for(&dotdot).ends_with("_/registry.json"));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().expect("tmp");
        let store = CacheStore::new(dir.path());
        let cfg = RegistryConfig::new("acme/tools", "v1");
        let doc = sample_doc();

        store.save(&cfg, &doc).expect("save");
        assert_eq!(store.load(&cfg), Some(doc));

        let text = std::fs::read_to_string(store.path_for(&cfg)).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\n  \"tools\""));
    }

    #[test]
    fn save_overwrites_previous_entry() {
        let dir = TempDir::new().expect("tmp");
        let store = CacheStore::new(dir.path());
        let cfg = RegistryConfig::new("acme/tools", "v1");
        store.save(&cfg, &sample_doc()).expect("first save");

        let replacement = RegistryDocument::new(vec![ToolEntry::new("only")]);
        store.save(&cfg, &replacement).expect("second save");
        assert_eq!(store.load(&cfg), Some(replacement));
    }

    #[test]
    fn load_missing_is_none() {
        let dir = TempDir::new().expect("tmp");
        let store = CacheStore::new(dir.path());
        assert!(store.load(&RegistryConfig::default()).is_none());
    }

    #[test]
    fn corrupt_entry_is_deleted_on_load() {
        let dir = TempDir::new().expect("tmp");
        let store = CacheStore::new(dir.path());
        let cfg = RegistryConfig::new("acme/tools", "v1");
        let path = store.path_for(&cfg);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"\x00\xffnot json at all").unwrap();

        assert!(store.load(&cfg).is_none());
        assert!(!path.exists(), "corrupt cache should be purged");
    }

    #[test]
    fn structurally_invalid_entry_is_deleted_on_load() {
        let dir = TempDir::new().expect("tmp");
        let store = CacheStore::new(dir.path());
        let cfg = RegistryConfig::new("acme/tools", "v1");
        let path = store.path_for(&cfg);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, br#"{"tools": {"id": "x"}}"#).unwrap();

        assert!(store.load(&cfg).is_none());
        assert!(!path.exists());
    }

    #[test]
    fn null_fields_do_not_purge_entry() {
        let dir = TempDir::new().expect("tmp");
        let store = CacheStore::new(dir.path());
        let cfg = RegistryConfig::new("acme/tools", "v1");
        let path = store.path_for(&cfg);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, br#"{"tools":[{"id":"a","name":null,"install":null}]}"#).unwrap();

        let doc = store.load(&cfg).expect("entry with null fields loads");
        assert_eq!(doc.tools[0].id, "a");
        assert!(path.exists());
    }

    #[test]
    fn inspect_reports_without_deleting() {
        let dir = TempDir::new().expect("tmp");
        let store = CacheStore::new(dir.path());
        let cfg = RegistryConfig::new("acme/tools", "v1");

        let missing = store.inspect(&cfg);
        assert!(!missing.exists);
        assert!(missing.modified.is_none());
        assert_eq!(missing.tool_count, None);

        store.save(&cfg, &sample_doc()).expect("save");
        let present = store.inspect(&cfg);
        assert!(present.exists);
        assert!(present.modified.is_some());
        assert_eq!(present.tool_count, Some(2));

        std::fs::write(&present.path, b"garbage").unwrap();
        let corrupt = store.inspect(&cfg);
        assert!(corrupt.exists);
        assert_eq!(corrupt.tool_count, None);
        assert!(corrupt.path.exists(), "inspect must not purge");
    }
}
