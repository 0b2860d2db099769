//! Command-line interface for scoring location streams.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod input;
mod score;

pub use error::CliError;
use score::{ScoreArgs, run_score};

const ARG_INPUT: &str = "input";
const ARG_OVERPASS_URL: &str = "overpass-url";
const ARG_RADIUS: &str = "radius";
const ARG_SMOOTHING: &str = "smoothing";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_CACHE_CAPACITY: &str = "cache-capacity";

/// Run the Sahasi CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, the
/// input cannot be read or parsed, or the scores cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => run_score(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sahasi",
    about = "Safety scoring for streams of location samples",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score JSON-lines location entries, one score per line.
    Score(ScoreArgs),
}

#[cfg(test)]
mod tests;
