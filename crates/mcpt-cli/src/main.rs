mod commands;
mod output;
mod opts;
mod runner;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::add::AddArgs;
use commands::info::InfoArgs;
use commands::init::InitArgs;
use commands::list::ListArgs;
use commands::remove::RemoveArgs;
use commands::run::RunArgs;
use commands::search::SearchArgs;
use opts::GlobalOpts;

#[derive(Parser, Debug)]
#[command(
    name = "mcpt",
    version,
    about = "Discover MCP Tool Shop tools and manage workspace dependencies"
)]
struct Cli {
    #[command(flatten)]
    opts: GlobalOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all tools in the registry
    List(ListArgs),

    /// Show details for a tool
    Info(InfoArgs),

    /// Search tools by id, name, description, or tag
    Search(SearchArgs),

    /// Create an mcp.yaml workspace manifest
    Init(InitArgs),

    /// Add a tool to the workspace manifest
    Add(AddArgs),

    /// Remove a tool from the workspace manifest
    Remove(RemoveArgs),

    /// Show the execution plan for a tool (stub; nothing is executed)
    Run(RunArgs),

    /// Registry cache commands
    #[command(subcommand)]
    Registry(RegistryCommand),

    /// Check configuration, cache, and connectivity
    Doctor,
}

#[derive(Subcommand, Debug)]
enum RegistryCommand {
    /// Show where registry data comes from, without fetching
    Status,

    /// Fetch the registry and update the cache
    Refresh,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let opts = &cli.opts;
    setup_logging(opts.verbose);

    match cli.command {
        Command::List(args) => commands::list::cmd_list(opts, &args),
        Command::Info(args) => commands::info::cmd_info(opts, &args),
        Command::Search(args) => commands::search::cmd_search(opts, &args),
        Command::Init(args) => commands::init::cmd_init(opts, &args),
        Command::Add(args) => commands::add::cmd_add(opts, &args),
        Command::Remove(args) => commands::remove::cmd_remove(opts, &args),
        Command::Run(args) => commands::run::cmd_run(opts, &args),
        Command::Registry(cmd) => match cmd {
            RegistryCommand::Status => commands::registry::cmd_status(opts),
            RegistryCommand::Refresh => commands::registry::cmd_refresh(opts),
        },
        Command::Doctor => commands::doctor::cmd_doctor(opts),
    }
}

/// Log to stderr. `MCPT_LOG` takes an `EnvFilter` directive; `--verbose`
/// forces debug output.
fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("MCPT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();
}
