//! `mcpt init`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use mcpt_workspace::MCP_YAML_FILENAME;
use serde_json::{Value, json};

use crate::opts::GlobalOpts;
use crate::output::print_success;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to create the manifest in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing mcp.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn cmd_init(opts: &GlobalOpts, args: &InitArgs) -> Result<()> {
    let config_path = args.path.join(MCP_YAML_FILENAME);
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists; use --force to overwrite",
            config_path.display()
        );
    }

    fs::create_dir_all(&args.path)
        .with_context(|| format!("create directory {}", args.path.display()))?;
    let registry = opts.explicit_registry();
    mcpt_workspace::write_default(&config_path, &registry)?;
    tracing::debug!("wrote {}", config_path.display());

    let data = if opts.wants_json() {
        json!({
            "path": config_path,
            "registry": registry,
        })
    } else {
        Value::String(format!("Created {}", config_path.display()))
    };
    print_success(opts, data, None, Vec::new())
}
