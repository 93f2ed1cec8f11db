//! `mcpt info`.

use anyhow::{Result, bail};
use clap::Args;
use mcpt_registry::ToolEntry;
use serde_json::Value;

use crate::commands::{REFRESH_HINT, load_registry};
use crate::opts::GlobalOpts;
use crate::output::{origin_warnings, print_notice, print_success, registry_meta};

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Tool id
    pub tool_id: String,
}

pub fn cmd_info(opts: &GlobalOpts, args: &InfoArgs) -> Result<()> {
    let cfg = opts.registry_config();
    let resolution = load_registry(opts, &cfg, false)?;

    let Some(tool) = resolution.document.find(&args.tool_id) else {
        print_notice(opts, REFRESH_HINT);
        bail!("tool not found: {}", args.tool_id);
    };

    let data = if opts.wants_json() {
        serde_json::to_value(tool)?
    } else {
        Value::String(render_tool(tool))
    };
    print_success(
        opts,
        data,
        Some(registry_meta(&cfg, resolution.origin)),
        origin_warnings(resolution.origin),
    )
}

fn render_tool(tool: &ToolEntry) -> String {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    let heading = if tool.name.is_empty() {
        tool.id.clone()
    } else {
        format!("{} ({})", tool.name, tool.id)
    };
    let rows = [
        ("Description", tool.description.clone()),
        ("Repository", opt(&tool.repo)),
        ("Install Type", opt(&tool.install.kind)),
        ("Git URL", opt(&tool.install.url)),
        ("Default Ref", opt(&tool.install.default_ref)),
        ("Tags", tool.tags.join(", ")),
        ("Safe Run", tool.defaults.safe_run.to_string()),
    ];

    let mut out = heading;
    out.push('\n');
    for (key, value) in rows {
        out.push_str(&format!("\n  {key:<15}{value}"));
    }
    out
}
