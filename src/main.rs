//! websync CLI - project org tables to JSON and mirror them to a remote store
//!
//! Usage: websync [--config FILE]... <COMMAND>
//!
//! Commands:
//!   watch    Watch source and mirror trees (default)
//!   convert  Run the table pipeline once
//!   parse    Print a named table as JSON
//!   push     Push one mirror file
//!   seed     Create missing table outputs

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "websync=info",
        2 => "websync=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => commands::watch::cmd_watch(&cli.config, cli.json),
        Commands::Convert { file } => commands::convert::cmd_convert(&cli.config, &file, cli.json),
        Commands::Parse { file, table } => commands::convert::cmd_parse(&file, &table),
        Commands::Push { file } => commands::push::cmd_push(&cli.config, &file, cli.json),
        Commands::Seed => commands::seed::cmd_seed(&cli.config, cli.json),
    }
}
