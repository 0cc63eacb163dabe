//! csv-merge: concatenate the CSV files of a directory into one file

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
