use std::sync::Arc;

use tokio::sync::RwLock;

use crate::chain::ChainService;
use crate::config::Config;
use crate::watchlist::Watchlist;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ChainService>,
    pub inner: Arc<RwLock<AppStateInner>>,
}

pub struct AppStateInner {
    pub watchlist: Watchlist,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_service(Arc::new(ChainService::new(config)), &config.watchlist)
    }

    pub fn with_service(service: Arc<ChainService>, watchlist: &[String]) -> Self {
        Self {
            service,
            inner: Arc::new(RwLock::new(AppStateInner {
                watchlist: Watchlist::new(watchlist),
            })),
        }
    }
}
