//! Slidedown CLI - slide deck compiler.
//!
//! Provides commands for:
//! - `build`: Compile a deck into an HTML presentation
//! - `parse`: Print the parsed directive tree
//! - `directives`: List the available directives

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, DirectivesArgs, ParseArgs};
use output::Output;

/// Slidedown - compile directive markup into HTML slide decks.
#[derive(Parser)]
#[command(name = "slidedown", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a deck into an HTML presentation.
    Build(BuildArgs),
    /// Parse a deck and print its directive tree.
    Parse(ParseArgs),
    /// List the available directives.
    Directives(DirectivesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Build(args) => args.verbose,
        Commands::Parse(args) => args.verbose,
        Commands::Directives(_) => false,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Parse(args) => args.execute(),
        Commands::Directives(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
