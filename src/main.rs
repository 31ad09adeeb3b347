//! Converts coordinates between the Israeli grid and WGS84, one per line.
//!
//! Usage:
//!     itm to-gps --precision 7 < grid_refs.txt
//!     itm to-itm < locations.txt
//!
//! Set `RUST_LOG=debug` for diagnostics on stderr.

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use itm::stream::{convert_lines, Direction};
use itm::DEFAULT_PRECISION;
use tracing_subscriber::EnvFilter;

/// Israeli Transverse Mercator ⇄ WGS84 conversion over stdin/stdout
#[derive(Parser, Debug)]
#[command(name = "itm")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// ITM grid references (or {"x":..,"y":..} lines) in, WGS84 JSON locations out
    ToGps {
        /// Decimal places the output locations display with
        #[arg(long, default_value_t = DEFAULT_PRECISION)]
        precision: u8,
    },

    /// "lat, lng" (or {"lat":..,"lng":..} lines) in, ITM JSON points out
    ToItm,
}

impl Commands {
    fn direction(&self) -> Direction {
        match self {
            Commands::ToGps { .. } => Direction::ItmToGps,
            Commands::ToItm => Direction::GpsToItm,
        }
    }

    fn precision(&self) -> u8 {
        match *self {
            Commands::ToGps { precision } => precision,
            Commands::ToItm => DEFAULT_PRECISION,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let command = &cli.command;

    match convert_lines(
        io::stdin().lock(),
        io::stdout().lock(),
        command.direction(),
        command.precision(),
    ) {
        Ok(summary) => {
            if summary.failed > 0 {
                tracing::info!(failed = summary.failed, "some coordinates could not be converted");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
