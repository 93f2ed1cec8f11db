pub mod add;
pub mod doctor;
pub mod info;
pub mod init;
pub mod list;
pub mod registry;
pub mod remove;
pub mod run;
pub mod search;

use anyhow::{Result, bail};
use mcpt_registry::{RegistryConfig, RegistryError, Resolution};
use std::path::PathBuf;

use crate::opts::GlobalOpts;
use crate::output::print_notice;

pub(crate) const REFRESH_HINT: &str = "Stale registry? Try: mcpt list --refresh";

const OFFLINE_HINT: &str = "No cached registry and the network is unreachable. \
     Retry once online, or point --registry-source at a local registry.json.";

/// Resolve `cfg`, adding an offline hint when nothing cached could stand in
/// for a failed fetch.
pub(crate) fn load_registry(
    opts: &GlobalOpts,
    cfg: &RegistryConfig,
    force_refresh: bool,
) -> Result<Resolution> {
    opts.resolver()?
        .resolve_with_origin(cfg, force_refresh)
        .map_err(|err| {
            if let Some(hint) = offline_hint(&err) {
                print_notice(opts, hint);
            }
            anyhow::Error::new(err).context("load registry")
        })
}

fn offline_hint(err: &RegistryError) -> Option<&'static str> {
    err.is_offline().then_some(OFFLINE_HINT)
}

/// Workspace manifest path, failing with a pointer to `mcpt init` when absent.
pub(crate) fn existing_workspace(opts: &GlobalOpts) -> Result<PathBuf> {
    let path = opts.workspace_path();
    if !path.is_file() {
        bail!(
            "{} not found; run `mcpt init` first",
            path.display()
        );
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_hint_only_for_uncached_fetch_failures() {
        let offline = RegistryError::FetchFailed {
            url: "https://raw.githubusercontent.com/acme/tools/v1/registry.json".into(),
            cause: "timed out".into(),
            cached_available: false,
        };
        assert!(offline_hint(&offline).is_some_and(|h| h.contains("--registry-source")));

        let invalid = RegistryError::InvalidSource {
            value: "tools".into(),
            reason: "expected org/repo".into(),
        };
        assert!(offline_hint(&invalid).is_none());
    }
}
