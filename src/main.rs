use clap::Parser;
use metconvert::cli::{run, Cli};
use metconvert::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
