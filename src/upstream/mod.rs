//! Talking to the upstream option-chain API: session handshake, raw fetch, retry.

mod fetch;
mod retry;
mod session;

use thiserror::Error;

pub use fetch::fetch_raw;
pub use retry::{RetryExhausted, RetryPolicy, RetryState};
pub use session::{Session, ensure_session};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to fetch {symbol} after {attempts} attempts: {last}")]
    Exhausted {
        symbol: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}
