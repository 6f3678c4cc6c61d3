use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use super::data::ParsedChain;

/// `(SYMBOL, expiry)` with `None` standing for "all expiries".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    symbol: String,
    expiry: Option<String>,
}

impl CacheKey {
    pub fn new(symbol: &str, expiry: Option<&str>) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            expiry: expiry.map(String::from),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.symbol, self.expiry.as_deref().unwrap_or("ALL"))
    }
}

struct CacheEntry {
    created: Instant,
    chain: Arc<ParsedChain>,
}

/// Time-bounded memo of parsed chains.
///
/// Stale entries are never served but stay in the map until overwritten.
pub struct ChainCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl ChainCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached chain, if it is younger than the TTL.
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<ParsedChain>> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.created.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.chain))
    }

    /// Store `chain` stamped with the current time, replacing any prior entry.
    pub async fn insert(&self, key: CacheKey, chain: Arc<ParsedChain>) {
        let entry = CacheEntry {
            created: Instant::now(),
            chain,
        };
        self.entries.write().await.insert(key, entry);
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
