use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::canonical_symbol;
use super::data::ParsedChain;
use super::service::ChainService;

/// Outcome for one symbol of a batch.
#[derive(Debug, Clone)]
pub enum BatchEntry {
    Success(Arc<ParsedChain>),
    Failure(String),
}

impl BatchEntry {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchEntry::Success(_))
    }
}

/// `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`.
impl Serialize for BatchEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BatchEntry", 2)?;
        match self {
            BatchEntry::Success(chain) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", chain)?;
            }
            BatchEntry::Failure(error) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

/// One entry per distinct uppercased symbol.
pub type BatchResult = BTreeMap<String, BatchEntry>;

impl ChainService {
    /// Fetch every symbol over one shared session, at most `concurrency` at a time.
    ///
    /// Failures are recorded per symbol; the batch itself never fails.
    pub async fn batch_fetch(
        self: &Arc<Self>,
        symbols: &[String],
        expiry: Option<&str>,
        concurrency: usize,
    ) -> BatchResult {
        let symbols = unique_symbols(symbols);

        let session = match self.open_session() {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "could not open batch session");
                let error = err.to_string();
                return symbols
                    .into_iter()
                    .map(|symbol| (symbol, BatchEntry::Failure(error.clone())))
                    .collect();
            }
        };

        let gate = Arc::new(Semaphore::new(concurrency.max(1)));
        let throttle = self.batch.throttle();
        let mut workers = JoinSet::new();

        for symbol in &symbols {
            let service = Arc::clone(self);
            let session = session.clone();
            let gate = Arc::clone(&gate);
            let symbol = symbol.clone();
            let expiry = expiry.map(String::from);

            workers.spawn(async move {
                let entry = match gate.acquire_owned().await {
                    Ok(_permit) => {
                        let entry = match service
                            .get_parsed_chain(&symbol, expiry.as_deref(), Some(&session))
                            .await
                        {
                            Ok(chain) => BatchEntry::Success(chain),
                            Err(err) => BatchEntry::Failure(err.to_string()),
                        };
                        // Slot is held through the pause.
                        tokio::time::sleep(throttle).await;
                        entry
                    }
                    Err(err) => BatchEntry::Failure(err.to_string()),
                };
                (symbol, entry)
            });
        }
        drop(session);

        let mut results = BatchResult::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((symbol, entry)) => {
                    results.insert(symbol, entry);
                }
                Err(err) => warn!(error = %err, "batch worker did not finish"),
            }
        }
        for symbol in symbols {
            results
                .entry(symbol)
                .or_insert_with(|| BatchEntry::Failure("worker did not finish".into()));
        }

        let ok = results.values().filter(|e| e.is_success()).count();
        info!(total = results.len(), ok, failed = results.len() - ok, "batch complete");
        results
    }
}

/// Canonical symbols in first-seen order, blanks and repeats dropped.
fn unique_symbols(symbols: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(symbols.len());
    for symbol in symbols.iter().filter_map(|s| canonical_symbol(s)) {
        if !unique.contains(&symbol) {
            unique.push(symbol);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::chain::data::ChainSummary;

    #[test]
    fn test_unique_symbols() {
        let input: Vec<String> = ["tcs", "TCS", " infy", "", "Tcs", "sbin"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(unique_symbols(&input), vec!["TCS", "INFY", "SBIN"]);
    }

    #[test]
    fn test_entry_json_shape() {
        let chain = Arc::new(ParsedChain {
            calls: vec![],
            puts: vec![],
            summary: ChainSummary {
                total_calls_oi: 0,
                total_puts_oi: 0,
                highest_call_oi: None,
                highest_put_oi: None,
            },
            underlying: Some(10.0),
            expiry_dates: vec![],
        });

        let ok = serde_json::to_value(BatchEntry::Success(chain)).unwrap();
        assert_eq!(ok["success"], json!(true));
        assert_eq!(ok["data"]["underlying"], json!(10.0));
        assert!(ok.get("error").is_none());

        let failed = serde_json::to_value(BatchEntry::Failure("boom".into())).unwrap();
        assert_eq!(failed, json!({ "success": false, "error": "boom" }));
    }
}
