use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::canonical_symbol;

// ── Request types ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ExpiryQuery {
    pub expiry: Option<String>,
}

#[derive(Deserialize)]
pub struct BatchQuery {
    pub expiry: Option<String>,
    pub concurrency: Option<usize>,
}

/// Either `{"symbols": [...], "expiry": "..."}` or a bare list of symbols.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum BatchRequest {
    Wrapped {
        #[serde(default)]
        symbols: Vec<String>,
        expiry: Option<String>,
    },
    Bare(Vec<String>),
}

impl BatchRequest {
    pub fn into_parts(self) -> (Vec<String>, Option<String>) {
        match self {
            BatchRequest::Wrapped { symbols, expiry } => (symbols, expiry),
            BatchRequest::Bare(symbols) => (symbols, None),
        }
    }
}

#[derive(Deserialize)]
pub struct StockRequest {
    pub stock: String,
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SymbolsResponse {
    pub symbols: Vec<String>,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<String>,
}

// ── Validation ───────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Provide at least one symbol in JSON body or query param.")]
    Empty,

    #[error("Max {max} symbols at once to avoid rate limiting (got {count}).")]
    TooMany { count: usize, max: usize },

    #[error("Symbol at position {index} is blank.")]
    Blank { index: usize },
}

/// Batch input check, done before any upstream I/O.
pub fn validate_symbols(symbols: &[String], max: usize) -> Result<(), ValidationError> {
    if symbols.is_empty() {
        return Err(ValidationError::Empty);
    }
    if symbols.len() > max {
        return Err(ValidationError::TooMany {
            count: symbols.len(),
            max,
        });
    }
    if let Some(index) = symbols.iter().position(|s| canonical_symbol(s).is_none()) {
        return Err(ValidationError::Blank { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("SYM{i}")).collect()
    }

    #[test]
    fn test_validate_symbols() {
        assert_eq!(validate_symbols(&[], 60), Err(ValidationError::Empty));
        assert_eq!(validate_symbols(&symbols(1), 60), Ok(()));
        assert_eq!(validate_symbols(&symbols(60), 60), Ok(()));
        assert_eq!(
            validate_symbols(&symbols(61), 60),
            Err(ValidationError::TooMany { count: 61, max: 60 })
        );
        let with_blank = vec!["TCS".to_string(), " ".to_string()];
        assert_eq!(
            validate_symbols(&with_blank, 60),
            Err(ValidationError::Blank { index: 1 })
        );
    }

    #[test]
    fn test_batch_request_shapes() {
        let wrapped: BatchRequest =
            serde_json::from_str(r#"{"symbols": ["tcs"], "expiry": "25-Nov-2025"}"#).unwrap();
        assert_eq!(
            wrapped.into_parts(),
            (vec!["tcs".to_string()], Some("25-Nov-2025".to_string()))
        );

        let bare: BatchRequest = serde_json::from_str(r#"["tcs", "infy"]"#).unwrap();
        assert_eq!(bare.into_parts().0, vec!["tcs", "infy"]);

        let missing: BatchRequest = serde_json::from_str(r#"{"expiry": null}"#).unwrap();
        assert!(missing.into_parts().0.is_empty());
    }
}
