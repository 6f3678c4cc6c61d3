use serde::{Deserialize, Serialize};

/// One strike's data for one side (call or put).
///
/// Integer fields default to 0 and price-like fields to `None` when upstream omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRow {
    pub strike: Option<f64>,
    pub ltp: Option<f64>,
    pub oi: i64,
    pub chg_in_oi: i64,
    pub volume: i64,
    pub iv: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSummary {
    pub total_calls_oi: i64,
    pub total_puts_oi: i64,
    #[serde(with = "empty_object")]
    pub highest_call_oi: Option<OptionRow>,
    #[serde(with = "empty_object")]
    pub highest_put_oi: Option<OptionRow>,
}

/// Calls, puts and summary for one symbol: the unit that is cached and served.
///
/// `calls[i]` and `puts[i]` come from the same upstream row and share a strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedChain {
    pub calls: Vec<OptionRow>,
    pub puts: Vec<OptionRow>,
    pub summary: ChainSummary,
    pub underlying: Option<f64>,
    #[serde(rename = "expiryDates")]
    pub expiry_dates: Vec<String>,
}

/// `None` travels as `{}`.
mod empty_object {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Map, Value};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(v) => v.serialize(serializer),
            None => Map::new().serialize(serializer),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Object(map) if map.is_empty() => Ok(None),
            other => serde_json::from_value(other)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json};

    fn row(oi: i64) -> OptionRow {
        OptionRow {
            strike: Some(100.0),
            ltp: None,
            oi,
            chg_in_oi: 0,
            volume: 0,
            iv: None,
            bid: None,
            ask: None,
        }
    }

    #[test]
    fn test_missing_highest_serializes_as_empty_object() {
        let summary = ChainSummary {
            total_calls_oi: 0,
            total_puts_oi: 5,
            highest_call_oi: None,
            highest_put_oi: Some(row(5)),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["highest_call_oi"], json!({}));
        assert_eq!(value["highest_put_oi"]["oi"], json!(5));
        assert_eq!(value["highest_put_oi"]["ltp"], Value::Null);

        let back: ChainSummary = serde_json::from_value(value).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn test_expiry_dates_field_name() {
        let chain = ParsedChain {
            calls: vec![],
            puts: vec![],
            summary: ChainSummary {
                total_calls_oi: 0,
                total_puts_oi: 0,
                highest_call_oi: None,
                highest_put_oi: None,
            },
            underlying: None,
            expiry_dates: vec!["25-Nov-2025".into()],
        };
        let value = serde_json::to_value(&chain).unwrap();
        assert_eq!(value["expiryDates"], json!(["25-Nov-2025"]));
        assert_eq!(value["underlying"], Value::Null);
    }
}
