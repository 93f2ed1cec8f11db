//! `mcpt remove`.

use anyhow::Result;
use clap::Args;
use serde_json::{Value, json};

use crate::commands::existing_workspace;
use crate::opts::GlobalOpts;
use crate::output::print_success;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Tool id to drop from the workspace
    pub tool_id: String,
}

pub fn cmd_remove(opts: &GlobalOpts, args: &RemoveArgs) -> Result<()> {
    let path = existing_workspace(opts)?;
    let removed = mcpt_workspace::remove_tool(&path, &args.tool_id)?;

    let data = if opts.wants_json() {
        json!({ "tool_id": args.tool_id, "removed": removed, "path": path })
    } else if removed {
        Value::String(format!("Removed {} from {}", args.tool_id, path.display()))
    } else {
        Value::String(format!("{} not found in workspace.", args.tool_id))
    };
    print_success(opts, data, None, Vec::new())
}
