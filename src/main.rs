//! # tabstore command-line entry point
//!
//! ```bash
//! tabstore convert -i people.csv -o people.json
//! tabstore inspect -i people.csv --column name
//! tabstore edit -i people.csv -o trimmed.csv --drop-column email --set 0:name=Ada
//! ```
//!
//! Set `RUST_LOG=debug` to see what the store is doing.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    tabstore::logging::init()?;

    let cli = cli::Cli::parse();
    cli::run_command(cli.command)
}
