mod cli_utils;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{cmd_inspect, cmd_query};

#[derive(Parser)]
#[command(name = "geotree")]
#[command(
    about = "Resolve IPv4 addresses to country codes from range lists",
    long_about = "geotree - In-memory IPv4 range tree for country lookups\n\n\
    Loads range files (CSV, optionally gzip-compressed) into a balanced search tree\n\
    and resolves addresses against it. Each row is either an explicit range or a\n\
    CIDR block, with the country code in the last column:\n\n\
      1.0.0.0,1.0.0.255,AU\n\
      8.8.8.0/24,US\n\n\
    Malformed rows are skipped with a warning (set RUST_LOG=warn to see them).\n\n\
    Examples:\n\
      geotree query ranges.csv -i 8.8.8.8 -i 2.1.1.1\n\
      cat ips.txt | geotree query ranges.csv.gz -i - --format json\n\
      geotree inspect ranges.csv --verbose"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the country for one or more addresses
    Query {
        /// Range files (CSV, gzip detected automatically, "-" for stdin)
        #[arg(value_name = "RANGES", required = true)]
        ranges: Vec<PathBuf>,

        /// Address to look up (repeatable); "-" reads addresses from stdin, one per line
        #[arg(short, long = "ip", value_name = "IP", required = true)]
        ips: Vec<String>,

        /// Output format: text (default, tab-separated) or json (NDJSON)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Quiet mode - no output, only exit code (0 = all found, 1 = any not found)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Inspect range files and report tree statistics
    Inspect {
        /// Range files (CSV, gzip detected automatically, "-" for stdin)
        #[arg(value_name = "RANGES", required = true)]
        ranges: Vec<PathBuf>,

        /// Output statistics as JSON
        #[arg(short, long)]
        json: bool,

        /// List skipped records
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            ranges,
            ips,
            format,
            quiet,
        } => cmd_query(ranges, ips, format, quiet),
        Commands::Inspect {
            ranges,
            json,
            verbose,
        } => cmd_inspect(ranges, json, verbose),
    }
}
