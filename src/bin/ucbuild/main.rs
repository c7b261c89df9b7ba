//! ucbuild CLI - builds and packages UCBlock for SMS++

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        ucbuild::util::diagnostic::emit(&e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("ucbuild=debug")
    } else {
        EnvFilter::new("ucbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Create(args) => commands::create::execute(args, cli.verbose),
        Commands::Source(args) => commands::source::execute(args),
        Commands::Build(args) => commands::build::execute(args, cli.verbose),
        Commands::Package(args) => commands::package::execute(args, cli.verbose),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Inspect => commands::inspect::execute(),
        Commands::Clean(args) => commands::clean::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
