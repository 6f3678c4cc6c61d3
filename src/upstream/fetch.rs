use serde_json::Value;
use tracing::debug;

use super::{FetchError, RetryPolicy, Session};

/// Fetch the raw option-chain JSON for `symbol`, retrying per `policy`.
///
/// The body is returned as upstream sent it.
pub async fn fetch_raw(
    symbol: &str,
    session: &Session,
    policy: &RetryPolicy,
) -> Result<Value, FetchError> {
    let url = session.config().chain_url();

    let result = policy
        .run(|attempt| {
            let url = url.as_str();
            async move {
                debug!(symbol, attempt, "requesting option chain");
                let resp = session
                    .get(url)
                    .query(&[("symbol", symbol)])
                    .timeout(session.config().request_timeout())
                    .send()
                    .await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(FetchError::Status(status));
                }
                Ok(resp.json::<Value>().await?)
            }
        })
        .await;

    result.map_err(|exhausted| FetchError::Exhausted {
        symbol: symbol.to_string(),
        attempts: exhausted.attempts,
        last: Box::new(exhausted.last),
    })
}
