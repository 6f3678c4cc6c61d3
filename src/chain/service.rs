use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{BatchConfig, Config, UpstreamConfig};
use crate::upstream::{FetchError, RetryPolicy, Session, ensure_session, fetch_raw};

use super::cache::{CacheKey, ChainCache};
use super::data::ParsedChain;
use super::expiry_filter;
use super::normalize::parse_payload;

/// Owns the chain cache and upstream settings; every request path goes through here.
pub struct ChainService {
    upstream: Arc<UpstreamConfig>,
    retry: RetryPolicy,
    cache: ChainCache,
    pub(super) batch: BatchConfig,
}

impl ChainService {
    pub fn new(config: &Config) -> Self {
        Self {
            upstream: Arc::new(config.upstream.clone()),
            retry: RetryPolicy::new(config.upstream.max_attempts, config.upstream.backoff_step()),
            cache: ChainCache::new(config.cache.ttl()),
            batch: config.batch.clone(),
        }
    }

    pub fn cache(&self) -> &ChainCache {
        &self.cache
    }

    pub fn batch_config(&self) -> &BatchConfig {
        &self.batch
    }

    /// A fresh upstream connection with its own cookie jar.
    pub fn open_session(&self) -> Result<Session, FetchError> {
        Session::open(Arc::clone(&self.upstream))
    }

    /// Parsed chain for `symbol`, from cache while fresh, otherwise from upstream.
    ///
    /// Without a `session` a private one is opened for this call and dropped
    /// before returning, whatever the outcome.
    pub async fn get_parsed_chain(
        &self,
        symbol: &str,
        expiry: Option<&str>,
        session: Option<&Session>,
    ) -> Result<Arc<ParsedChain>, FetchError> {
        let expiry = expiry_filter(expiry);
        let key = CacheKey::new(symbol, expiry);
        if let Some(chain) = self.cache.get(&key).await {
            debug!(%key, "cache hit");
            return Ok(chain);
        }

        let owned;
        let session = match session {
            Some(session) => session,
            None => {
                owned = self.open_session()?;
                &owned
            }
        };

        ensure_session(session).await;
        let raw = fetch_raw(key.symbol(), session, &self.retry).await?;
        let chain = Arc::new(parse_payload(&raw, expiry));

        info!(%key, strikes = chain.calls.len(), "option chain refreshed");
        self.cache.insert(key, Arc::clone(&chain)).await;
        Ok(chain)
    }
}
