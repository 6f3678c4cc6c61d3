use std::sync::Arc;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use tracing::{debug, warn};

use crate::config::UpstreamConfig;

use super::FetchError;

/// One upstream connection: a cookie-carrying HTTP client plus the endpoint it talks to.
///
/// Clones share the same connection pool and cookie jar.
#[derive(Clone)]
pub struct Session {
    client: reqwest::Client,
    config: Arc<UpstreamConfig>,
}

impl Session {
    pub fn open(config: Arc<UpstreamConfig>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// GET `url` with the browser-like headers upstream insists on.
    pub(super) fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, &self.config.accept)
            .header(ACCEPT_LANGUAGE, &self.config.accept_language)
    }

    /// Hit the upstream root page so any session cookies land in this client's jar.
    pub async fn bootstrap(&self) -> Result<(), FetchError> {
        let resp = self
            .get(&self.config.base_url)
            .timeout(self.config.bootstrap_timeout())
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(())
    }
}

/// Best-effort handshake before the first data request of a fetch episode.
///
/// A failed bootstrap is logged and dropped here: data requests go ahead
/// without the cookies and stand or fall on their own retries.
pub async fn ensure_session(session: &Session) {
    match session.bootstrap().await {
        Ok(()) => debug!(base_url = %session.config.base_url, "upstream session bootstrapped"),
        Err(err) => warn!(
            base_url = %session.config.base_url,
            error = %err,
            "session bootstrap failed, continuing without it"
        ),
    }
}
