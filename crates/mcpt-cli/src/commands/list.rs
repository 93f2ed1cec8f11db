//! `mcpt list`.

use anyhow::Result;
use clap::Args;
use mcpt_registry::ToolEntry;
use serde_json::Value;

use crate::commands::load_registry;
use crate::opts::GlobalOpts;
use crate::output::{origin_warnings, print_success, registry_meta, render_table, truncate};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Re-fetch the registry even if a cached copy exists
    #[arg(long)]
    pub refresh: bool,
}

pub fn cmd_list(opts: &GlobalOpts, args: &ListArgs) -> Result<()> {
    let cfg = opts.registry_config();
    let resolution = load_registry(opts, &cfg, args.refresh)?;
    let tools = &resolution.document.tools;

    let data = if opts.wants_json() {
        serde_json::to_value(tools)?
    } else if tools.is_empty() {
        Value::String("No tools found in registry.".into())
    } else {
        Value::String(format!(
            "{}\n\n{} tools",
            tool_table(tools, 60),
            tools.len()
        ))
    };
    print_success(
        opts,
        data,
        Some(registry_meta(&cfg, resolution.origin)),
        origin_warnings(resolution.origin),
    )
}

/// ID / Name / Description / Tags table shared with `search`.
pub(crate) fn tool_table(tools: &[ToolEntry], description_width: usize) -> String {
    let rows: Vec<Vec<String>> = tools
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.name.clone(),
                truncate(&t.description, description_width),
                t.tags.join(", "),
            ]
        })
        .collect();
    render_table(&["ID", "Name", "Description", "Tags"], &rows)
}
