//! `mcpt run`: prints the execution plan; tools are never executed.

use anyhow::{Result, bail};
use clap::Args;
use serde_json::{Value, json};

use crate::commands::load_registry;
use crate::opts::GlobalOpts;
use crate::output::{origin_warnings, print_success, registry_meta};
use crate::runner::{generate_run_plan, render_stub};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Tool id from the registry
    pub tool_id: String,

    /// Arguments forwarded to the tool; put `--` before any that start with `-`
    pub args: Vec<String>,

    /// Request real execution (not implemented; prints the plan)
    #[arg(long)]
    pub real: bool,
}

pub fn cmd_run(opts: &GlobalOpts, args: &RunArgs) -> Result<()> {
    let cfg = opts.registry_config();
    let resolution = load_registry(opts, &cfg, false)?;
    let Some(tool) = resolution.document.find(&args.tool_id) else {
        bail!("tool not found: {}", args.tool_id);
    };

    let plan = generate_run_plan(tool, &args.args);
    let mode = if args.real { "real" } else { "stub" };
    let mut warnings = origin_warnings(resolution.origin);

    let data = if opts.wants_json() {
        json!({ "mode": mode, "executed": false, "plan": plan })
    } else if args.real {
        Value::String(format!(
            "Executing {}...\nReal execution not yet implemented.\n\
             Tool would be executed with the following plan:\n{}",
            plan.tool_id,
            serde_json::to_string_pretty(&plan)?
        ))
    } else {
        Value::String(render_stub(&plan))
    };
    if args.real {
        warnings.push("real execution is not implemented; nothing was run".into());
    }
    print_success(
        opts,
        data,
        Some(registry_meta(&cfg, resolution.origin)),
        warnings,
    )
}
