//! `mcpt registry status|refresh`.

use anyhow::Result;
use mcpt_registry::{Origin, RegistryStatus};
use serde_json::{Value, json};

use crate::commands::load_registry;
use crate::opts::GlobalOpts;
use crate::output::{origin_warnings, print_success, registry_meta};

pub fn cmd_status(opts: &GlobalOpts) -> Result<()> {
    let cfg = opts.registry_config();
    let status = opts.resolver()?.status(&cfg);

    let data = if opts.wants_json() {
        serde_json::to_value(&status)?
    } else {
        Value::String(render_status(&status))
    };
    print_success(opts, data, None, Vec::new())
}

pub fn cmd_refresh(opts: &GlobalOpts) -> Result<()> {
    let cfg = opts.registry_config();
    let resolution = load_registry(opts, &cfg, true)?;
    let count = resolution.document.tools.len();

    let data = if opts.wants_json() {
        json!({ "tool_count": count, "origin": resolution.origin })
    } else {
        Value::String(match resolution.origin {
            Origin::Remote => format!("Registry refreshed: {count} tools"),
            Origin::LocalFile => format!("Registry loaded from local file: {count} tools"),
            Origin::StaleCache => format!("Registry unchanged: serving {count} cached tools"),
            Origin::Cache => format!("Registry cached: {count} tools"),
        })
    };
    print_success(
        opts,
        data,
        Some(registry_meta(&cfg, resolution.origin)),
        origin_warnings(resolution.origin),
    )
}

/// Multi-line status block, also used by `doctor`.
pub(crate) fn render_status(status: &RegistryStatus) -> String {
    let mut lines = vec![
        format!("  Source:        {}", status.source),
        format!("  Ref:           {}", status.git_ref),
        format!("  Cache:         {}", status.cache_path.display()),
    ];
    if status.cache_exists {
        let fetched = status
            .cache_mtime
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown".into());
        lines.push(format!("  Last fetched:  {fetched}"));
        lines.push(format!("  Cached tools:  {}", status.tool_count));
    } else {
        lines.push("  Cache file:    not found".into());
    }
    lines.push(format!("  Provenance:    {}", status.provenance));
    format!("Registry status\n{}", lines.join("\n"))
}
