//! The fetch-normalize-cache core.

mod batch;
pub mod cache;
pub mod data;
pub mod normalize;
mod service;

pub use batch::{BatchEntry, BatchResult};
pub use cache::{CacheKey, ChainCache};
pub use data::{ChainSummary, OptionRow, ParsedChain};
pub use service::ChainService;

/// Trimmed, uppercased symbol; `None` if nothing is left.
pub fn canonical_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim();
    (!symbol.is_empty()).then(|| symbol.to_uppercase())
}

/// Expiry label to filter on; blank input means all expiries.
pub fn expiry_filter(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|expiry| !expiry.is_empty())
}
