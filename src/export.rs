//! CSV export: calls and puts side by side, one line per strike.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::chain::{OptionRow, ParsedChain};

#[derive(Serialize)]
struct SideBySideRow {
    call_strike: Option<f64>,
    call_ltp: Option<f64>,
    call_oi: i64,
    call_chg_in_oi: i64,
    call_volume: i64,
    call_iv: Option<f64>,
    call_bid: Option<f64>,
    call_ask: Option<f64>,
    put_strike: Option<f64>,
    put_ltp: Option<f64>,
    put_oi: i64,
    put_chg_in_oi: i64,
    put_volume: i64,
    put_iv: Option<f64>,
    put_bid: Option<f64>,
    put_ask: Option<f64>,
}

impl SideBySideRow {
    fn new(call: &OptionRow, put: &OptionRow) -> Self {
        Self {
            call_strike: call.strike,
            call_ltp: call.ltp,
            call_oi: call.oi,
            call_chg_in_oi: call.chg_in_oi,
            call_volume: call.volume,
            call_iv: call.iv,
            call_bid: call.bid,
            call_ask: call.ask,
            put_strike: put.strike,
            put_ltp: put.ltp,
            put_oi: put.oi,
            put_chg_in_oi: put.chg_in_oi,
            put_volume: put.volume,
            put_iv: put.iv,
            put_bid: put.bid,
            put_ask: put.ask,
        }
    }
}

/// Attachment name, e.g. `TCS_all_optionchain.csv`.
pub fn download_filename(symbol: &str, expiry: Option<&str>) -> String {
    format!(
        "{}_{}_optionchain.csv",
        symbol.to_uppercase(),
        expiry.unwrap_or("all")
    )
}

pub fn chain_to_csv(chain: &ParsedChain) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    write_rows(&mut wtr, chain)?;
    let bytes = wtr
        .into_inner()
        .map_err(|err| err.into_error())
        .context("flushing CSV buffer")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

pub fn write_chain_csv(path: &Path, chain: &ParsedChain) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV file {}", path.display()))?;
    write_rows(&mut wtr, chain)?;
    wtr.flush()?;
    Ok(())
}

fn write_rows<W: std::io::Write>(wtr: &mut csv::Writer<W>, chain: &ParsedChain) -> Result<()> {
    if chain.calls.is_empty() {
        // serialize() only emits the header alongside the first record
        wtr.write_record(HEADER)?;
        return Ok(());
    }
    for (call, put) in chain.calls.iter().zip(&chain.puts) {
        wtr.serialize(SideBySideRow::new(call, put))?;
    }
    Ok(())
}

const HEADER: [&str; 16] = [
    "call_strike",
    "call_ltp",
    "call_oi",
    "call_chg_in_oi",
    "call_volume",
    "call_iv",
    "call_bid",
    "call_ask",
    "put_strike",
    "put_ltp",
    "put_oi",
    "put_chg_in_oi",
    "put_volume",
    "put_iv",
    "put_bid",
    "put_ask",
];
