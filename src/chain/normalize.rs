//! Turning upstream's loosely-shaped chain JSON into [`ParsedChain`].
//!
//! Upstream shape (only the parts read here):
//!
//! ```json
//! { "records": {
//!     "underlyingValue": 2451.3,
//!     "expiryDates": ["25-Nov-2025", "30-Dec-2025"],
//!     "data": [
//!       { "strikePrice": 2400,
//!         "CE": { "expiryDate": "25-Nov-2025", "lastPrice": 61.2, "openInterest": 812, ... },
//!         "PE": { "expiryDate": "25-Nov-2025", "lastPrice": 9.8, "openInterest": 1404, ... } }
//!     ] } }
//! ```
//!
//! Missing or non-numeric fields never fail the parse; they fall back to
//! 0 (counts) or `None` (prices).

use serde_json::Value;

use super::data::{ChainSummary, OptionRow, ParsedChain};

/// Calls, puts and their summary, before the payload metadata is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLegs {
    pub calls: Vec<OptionRow>,
    pub puts: Vec<OptionRow>,
    pub summary: ChainSummary,
}

impl NormalizedLegs {
    pub fn into_chain(self, underlying: Option<f64>, expiry_dates: Vec<String>) -> ParsedChain {
        ParsedChain {
            calls: self.calls,
            puts: self.puts,
            summary: self.summary,
            underlying,
            expiry_dates,
        }
    }
}

/// Normalize a full upstream payload: rows from `records.data`, plus the
/// underlying value and expiry list from the same `records` object.
pub fn parse_payload(raw: &Value, expiry: Option<&str>) -> ParsedChain {
    let records = &raw["records"];
    let rows = records["data"].as_array().map(Vec::as_slice).unwrap_or(&[]);
    let expiry_dates = records["expiryDates"]
        .as_array()
        .map(|dates| {
            dates
                .iter()
                .filter_map(|d| d.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    normalize(rows, expiry).into_chain(records["underlyingValue"].as_f64(), expiry_dates)
}

/// Split strike rows into aligned call/put legs and summarize them.
///
/// With an `expiry`, a row is kept when either side carries that expiry date.
pub fn normalize(rows: &[Value], expiry: Option<&str>) -> NormalizedLegs {
    let kept = rows.iter().filter(|row| match expiry {
        Some(expiry) => {
            matches_expiry(side(row, "CE"), expiry) || matches_expiry(side(row, "PE"), expiry)
        }
        None => true,
    });

    let mut calls = Vec::new();
    let mut puts = Vec::new();
    for row in kept {
        let strike = row["strikePrice"].as_f64();
        calls.push(option_row(strike, side(row, "CE")));
        puts.push(option_row(strike, side(row, "PE")));
    }

    let summary = ChainSummary {
        total_calls_oi: total_oi(&calls),
        total_puts_oi: total_oi(&puts),
        highest_call_oi: highest_oi(&calls).cloned(),
        highest_put_oi: highest_oi(&puts).cloned(),
    };

    NormalizedLegs {
        calls,
        puts,
        summary,
    }
}

fn side<'a>(row: &'a Value, key: &str) -> Option<&'a Value> {
    row.get(key).filter(|v| v.is_object())
}

fn matches_expiry(side: Option<&Value>, expiry: &str) -> bool {
    side.and_then(|s| s["expiryDate"].as_str()) == Some(expiry)
}

fn option_row(strike: Option<f64>, side: Option<&Value>) -> OptionRow {
    let empty = Value::Null;
    let s = side.unwrap_or(&empty);
    OptionRow {
        strike,
        ltp: s["lastPrice"].as_f64(),
        oi: count(&s["openInterest"]),
        chg_in_oi: count(&s["changeinOpenInterest"]),
        volume: count(&s["totalTradedVolume"]),
        iv: s["impliedVolatility"].as_f64(),
        bid: s["bidprice"].as_f64().or_else(|| s["bidPrice"].as_f64()),
        ask: s["askPrice"].as_f64(),
    }
}

/// Integer field, truncating fractional values; 0 when missing.
fn count(v: &Value) -> i64 {
    v.as_i64()
        .or_else(|| v.as_f64().map(|f| f as i64))
        .unwrap_or(0)
}

fn total_oi(rows: &[OptionRow]) -> i64 {
    rows.iter().fold(0i64, |total, r| total.saturating_add(r.oi))
}

/// Row with the largest OI; the earliest row wins a tie.
fn highest_oi(rows: &[OptionRow]) -> Option<&OptionRow> {
    rows.iter()
        .reduce(|best, row| if row.oi > best.oi { row } else { best })
}
