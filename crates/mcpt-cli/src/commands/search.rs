//! `mcpt search`.

use anyhow::Result;
use clap::Args;
use mcpt_registry::search::search_tools;
use serde_json::Value;

use crate::commands::{REFRESH_HINT, load_registry};
use crate::commands::list::tool_table;
use crate::opts::GlobalOpts;
use crate::output::{origin_warnings, print_notice, print_success, registry_meta};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Case-insensitive text matched against id, name, description, and tags
    pub query: String,
}

pub fn cmd_search(opts: &GlobalOpts, args: &SearchArgs) -> Result<()> {
    let cfg = opts.registry_config();
    let resolution = load_registry(opts, &cfg, false)?;
    let hits: Vec<_> = search_tools(&resolution.document, &args.query)
        .into_iter()
        .cloned()
        .collect();

    let data = if opts.wants_json() {
        serde_json::to_value(&hits)?
    } else if hits.is_empty() {
        print_notice(opts, REFRESH_HINT);
        Value::String(format!("No tools found matching: {}", args.query))
    } else {
        Value::String(format!(
            "Search results: {}\n\n{}",
            args.query,
            tool_table(&hits, 50)
        ))
    };
    let mut meta = registry_meta(&cfg, resolution.origin);
    meta["query"] = Value::String(args.query.clone());
    print_success(opts, data, Some(meta), origin_warnings(resolution.origin))
}
