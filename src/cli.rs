use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Option-chain proxy: fetches, normalizes and caches option chains from
/// the upstream exchange API and serves them over HTTP.
#[derive(Parser)]
#[command(name = "option-chain-proxy", version, about)]
pub struct Cli {
    /// TOML config file (defaults are used for anything it omits)
    #[arg(long, global = true, env = "OPTION_CHAIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level filter, e.g. "debug" or "option_chain_proxy=trace"
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(long)]
        port: Option<u16>,
    },

    /// Fetch one option chain and print it as JSON
    Chain {
        symbol: String,

        /// Only strikes with this expiry on either side (e.g. 25-Nov-2025)
        #[arg(long)]
        expiry: Option<String>,
    },

    /// Fetch several option chains concurrently and print the results as JSON
    Batch {
        #[arg(required = true)]
        symbols: Vec<String>,

        #[arg(long)]
        expiry: Option<String>,

        /// Maximum fetches in flight (defaults to the configured value)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Write an option chain as a side-by-side calls/puts CSV
    Download {
        symbol: String,

        #[arg(long)]
        expiry: Option<String>,

        /// Output path (default: SYMBOL_EXPIRY_optionchain.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}
