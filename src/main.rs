use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use option_chain_proxy::api;
use option_chain_proxy::api::types::validate_symbols;
use option_chain_proxy::chain::ChainService;
use option_chain_proxy::config::Config;
use option_chain_proxy::export;

mod cli;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.logging.init()?;

    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;

    match cli.command {
        cli::Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            rt.block_on(api::serve(&config))
        }
        cli::Command::Chain { symbol, expiry } => rt.block_on(async {
            let service = ChainService::new(&config);
            let chain = service
                .get_parsed_chain(&symbol, expiry.as_deref(), None)
                .await?;
            println!("{}", serde_json::to_string_pretty(&chain)?);
            Ok::<(), anyhow::Error>(())
        }),
        cli::Command::Batch {
            symbols,
            expiry,
            concurrency,
        } => rt.block_on(async {
            validate_symbols(&symbols, config.batch.max_symbols)?;
            let service = Arc::new(ChainService::new(&config));
            let concurrency = concurrency.unwrap_or(config.batch.default_concurrency);
            let results = service
                .batch_fetch(&symbols, expiry.as_deref(), concurrency)
                .await;
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok::<(), anyhow::Error>(())
        }),
        cli::Command::Download {
            symbol,
            expiry,
            output,
        } => rt.block_on(async {
            let service = ChainService::new(&config);
            let chain = service
                .get_parsed_chain(&symbol, expiry.as_deref(), None)
                .await?;
            let path = output.unwrap_or_else(|| {
                PathBuf::from(export::download_filename(&symbol, expiry.as_deref()))
            });
            export::write_chain_csv(&path, &chain)?;
            println!("Wrote {} strikes to {}", chain.calls.len(), path.display());
            Ok::<(), anyhow::Error>(())
        }),
    }
}
