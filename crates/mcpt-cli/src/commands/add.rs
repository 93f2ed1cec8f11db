//! `mcpt add`.

use anyhow::{Result, bail};
use clap::Args;
use mcpt_registry::search::suggest_similar;
use serde_json::{Value, json};

use crate::commands::{REFRESH_HINT, existing_workspace, load_registry};
use crate::opts::GlobalOpts;
use crate::output::{origin_warnings, print_notice, print_success, registry_meta};

const MAX_SUGGESTIONS: usize = 5;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Tool id from the registry
    pub tool_id: String,

    /// Pin the tool to a git ref
    #[arg(long = "ref")]
    pub git_ref: Option<String>,
}

pub fn cmd_add(opts: &GlobalOpts, args: &AddArgs) -> Result<()> {
    let path = existing_workspace(opts)?;
    let cfg = opts.registry_config();
    let resolution = load_registry(opts, &cfg, false)?;
    let mut warnings = origin_warnings(resolution.origin);

    let Some(tool) = resolution.document.find(&args.tool_id) else {
        let suggestions = suggest_similar(&resolution.document, &args.tool_id, MAX_SUGGESTIONS);
        if !suggestions.is_empty() {
            let lines: Vec<String> = suggestions
                .iter()
                .map(|t| format!("  {} - {}", t.id, t.name))
                .collect();
            print_notice(opts, &format!("Did you mean:\n{}", lines.join("\n")));
        }
        print_notice(opts, REFRESH_HINT);
        bail!("tool not found in registry: {}", args.tool_id);
    };

    let added = mcpt_workspace::add_tool(&path, &args.tool_id, args.git_ref.as_deref())?;
    if added && !tool.defaults.safe_run {
        warnings.push(format!(
            "{} has side effects; check its documentation for capability env vars",
            tool.id
        ));
    }

    let data = if opts.wants_json() {
        json!({
            "tool_id": args.tool_id,
            "ref": args.git_ref,
            "added": added,
            "path": path,
        })
    } else if added {
        Value::String(format!("Added {} to {}", args.tool_id, path.display()))
    } else {
        Value::String(format!("{} already in workspace.", args.tool_id))
    };
    print_success(
        opts,
        data,
        Some(registry_meta(&cfg, resolution.origin)),
        warnings,
    )
}
