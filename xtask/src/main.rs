// Licensed under the Apache-2.0 license

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

mod regmap;

#[derive(Parser, Debug)]
#[command(
    name = "xtask",
    author,
    version,
    about = "Merge IP-XACT register descriptions and generate register definitions"
)]
struct Cli {
    /// Merge registers found at the same address, keeping the last name
    #[arg(short = 'a', long = "merge-addr", conflicts_with = "merge_name")]
    merge_addr: bool,

    /// Merge registers with the same name (default)
    #[arg(short = 'n', long = "merge-name")]
    merge_name: bool,

    /// Project name written into generated files
    #[arg(short = 'p', long = "project", value_name = "NAME")]
    project: Option<String>,

    /// Output type to use instead of the output file extension
    #[arg(short = 't', long = "type", value_name = "EXT")]
    output_type: Option<String>,

    /// Log every merged element
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Input files followed by the output file
    #[arg(value_name = "FILE", num_args = 2.., required = true)]
    files: Vec<PathBuf>,
}

fn init_logger(verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .context("unable to set up logging")
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logger(cli.verbose) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    // The last positional argument is the output.
    let Some((output, inputs)) = cli.files.split_last() else {
        eprintln!("Error: no output file given");
        std::process::exit(1);
    };
    let options = regmap::Options {
        merge_by_address: cli.merge_addr,
        project: cli.project.clone(),
        output_type: cli.output_type.clone(),
    };

    if let Err(e) = regmap::run(inputs, output, &options) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
