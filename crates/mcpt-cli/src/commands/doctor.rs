//! `mcpt doctor`: configuration, cache and connectivity report.

use anyhow::Result;
use mcpt_registry::{Origin, RegistryStatus};
use serde::Serialize;
use serde_json::Value;

use crate::commands::registry::render_status;
use crate::opts::GlobalOpts;
use crate::output::print_success;

const MAX_NEXT_STEPS: usize = 3;

#[derive(Debug, Serialize)]
struct Connectivity {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<Origin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct WorkspaceCheck {
    path: std::path::PathBuf,
    exists: bool,
    tool_count: usize,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    git_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Report {
    version: &'static str,
    registry: RegistryStatus,
    connectivity: Connectivity,
    workspace: WorkspaceCheck,
    next_steps: Vec<String>,
}

pub fn cmd_doctor(opts: &GlobalOpts) -> Result<()> {
    let cfg = opts.registry_config();
    let resolver = opts.resolver()?;
    let status = resolver.status(&cfg);

    let connectivity = match resolver.resolve_with_origin(&cfg, true) {
        Ok(resolution) => Connectivity {
            ok: resolution.origin != Origin::StaleCache,
            origin: Some(resolution.origin),
            tool_count: Some(resolution.document.tools.len()),
            error: (resolution.origin == Origin::StaleCache)
                .then(|| "fetch failed; cached copy still usable".to_string()),
        },
        Err(err) => Connectivity {
            ok: false,
            origin: None,
            tool_count: None,
            error: Some(err.to_string()),
        },
    };

    let workspace = check_workspace(opts);
    let next_steps = next_steps(&status, &workspace);
    let report = Report {
        version: env!("CARGO_PKG_VERSION"),
        registry: status,
        connectivity,
        workspace,
        next_steps,
    };

    let data = if opts.wants_json() {
        serde_json::to_value(&report)?
    } else {
        Value::String(render_report(&report))
    };
    print_success(opts, data, None, Vec::new())
}

fn check_workspace(opts: &GlobalOpts) -> WorkspaceCheck {
    let path = opts.workspace_path();
    let mut check = WorkspaceCheck {
        exists: path.is_file(),
        path,
        tool_count: 0,
        git_ref: None,
        error: None,
    };
    if check.exists {
        match mcpt_workspace::read_config(&check.path) {
            Ok(config) => {
                check.tool_count = config.tools.len();
                check.git_ref = config.registry.and_then(|r| r.git_ref);
            }
            Err(err) => check.error = Some(err.to_string()),
        }
    }
    check
}

fn next_steps(status: &RegistryStatus, workspace: &WorkspaceCheck) -> Vec<String> {
    let mut steps = Vec::new();
    if !workspace.exists {
        steps.push("Run `mcpt init` to create a workspace".to_string());
    } else if workspace.tool_count == 0 && workspace.error.is_none() {
        steps.push("Run `mcpt add <tool-id>` to add a tool".to_string());
    }
    if workspace.git_ref.as_deref() == Some("main") {
        steps.push(format!(
            "Edit mcp.yaml to pin `ref: {}` for reproducibility",
            mcpt_registry::DEFAULT_REF
        ));
    }
    if !status.cache_exists && status.provenance != mcpt_registry::Provenance::LocalFile {
        steps.push("Run `mcpt list --refresh` to fetch the registry".to_string());
    }
    if steps.is_empty() {
        steps.push("All good! Run `mcpt list` to explore tools".to_string());
    }
    steps.truncate(MAX_NEXT_STEPS);
    steps
}

fn render_report(report: &Report) -> String {
    let mut out = vec![format!("mcpt doctor (v{})", report.version), String::new()];
    out.push(render_status(&report.registry));
    if report.registry.git_ref == "main" {
        out.push(format!(
            "  Tip: pin to a tagged release (e.g. {}) for reproducibility.",
            mcpt_registry::DEFAULT_REF
        ));
    }

    out.push(String::new());
    let c = &report.connectivity;
    out.push(match (&c.origin, &c.error) {
        (Some(Origin::LocalFile), _) => format!(
            "Local registry OK - {} tools",
            c.tool_count.unwrap_or_default()
        ),
        (Some(Origin::StaleCache), _) => format!(
            "Remote error - using cached registry ({} tools)",
            c.tool_count.unwrap_or_default()
        ),
        (_, Some(err)) => format!("Remote error: {err}"),
        _ => format!("Remote OK - {} tools fetched", c.tool_count.unwrap_or_default()),
    });

    out.push(String::new());
    let w = &report.workspace;
    out.push(match (&w.error, w.exists) {
        (Some(err), _) => format!("Workspace config error: {err}"),
        (None, true) => format!("Workspace OK - {} tools configured", w.tool_count),
        (None, false) => format!("No workspace at {}", w.path.display()),
    });

    out.push(String::new());
    out.push("Next steps".into());
    out.extend(report.next_steps.iter().map(|s| format!("  * {s}")));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpt_registry::Provenance;
    use std::path::PathBuf;

    fn status(cache_exists: bool, provenance: Provenance) -> RegistryStatus {
        RegistryStatus {
            source: "acme/tools".into(),
            git_ref: "v1".into(),
            cache_path: PathBuf::from("/tmp/cache/registry.json"),
            cache_exists,
            cache_mtime: None,
            tool_count: 0,
            provenance,
        }
    }

    fn workspace(exists: bool, tool_count: usize, git_ref: Option<&str>) -> WorkspaceCheck {
        WorkspaceCheck {
            path: PathBuf::from("mcp.yaml"),
            exists,
            tool_count,
            git_ref: git_ref.map(str::to_string),
            error: None,
        }
    }

    #[test]
    fn fresh_machine_gets_init_and_fetch_steps() {
        let steps = next_steps(
            &status(false, Provenance::NotLoaded),
            &workspace(false, 0, None),
        );
        assert_eq!(steps.len(), 2);
        assert!(steps[0].contains("mcpt init"));
        assert!(steps[1].contains("--refresh"));
    }

    #[test]
    fn steps_are_capped_at_three() {
        let steps = next_steps(
            &status(false, Provenance::NotLoaded),
            &workspace(true, 0, Some("main")),
        );
        assert_eq!(steps.len(), MAX_NEXT_STEPS);
        assert!(steps[1].contains("ref: v0.1.0"));
    }

    #[test]
    fn healthy_setup_says_all_good() {
        let steps = next_steps(&status(true, Provenance::Cache), &workspace(true, 2, Some("v1")));
        assert_eq!(steps, vec!["All good! Run `mcpt list` to explore tools".to_string()]);
    }
}
