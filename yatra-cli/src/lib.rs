//! Command-line interface for browsing the Yatra destination catalog.
#![forbid(unsafe_code)]

use std::io;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod error;

pub use error::CliError;

use commands::{RestBackendBuilder, run_command_with};
use config::{FavoritesArgs, SearchArgs, ToggleArgs};

/// Run the Yatra CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = io::stdout().lock();
    run_command_with(cli.command, &RestBackendBuilder, &mut stdout)
}

#[derive(Debug, Parser)]
#[command(
    name = "yatra",
    about = "Search the Yatra destination catalog and manage favorites",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List active destinations matching a query and facets.
    Search(SearchArgs),
    /// List the destinations a user has favorited.
    Favorites(FavoritesArgs),
    /// Add or remove a destination from a user's favorites.
    Toggle(ToggleArgs),
}

#[cfg(test)]
mod tests;
