//! Transaction records as returned by the node GraphQL endpoint

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// One on-chain transaction, as exposed by the `allTransactions` query.
///
/// `json_content` carries the raw call payload and execution result. Kwargs
/// and event data stay loosely typed (`serde_json::Value`) because numeric
/// fields arrive as plain numbers, decimal strings, or Xian fixed-point
/// objects (`{"__fixed__": "123.45"}`) depending on the submitting client.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    pub contract: String,
    pub function: String,
    pub sender: String,
    pub success: bool,
    pub created: DateTime<Utc>,
    #[serde(rename = "jsonContent", default)]
    pub json_content: JsonContent,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonContent {
    #[serde(default)]
    pub payload: Payload,
    #[serde(default)]
    pub tx_result: TxResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payload {
    /// Keyword arguments of the top-level call
    #[serde(default)]
    pub kwargs: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxResult {
    /// Events emitted during execution, in emission order (may be empty)
    #[serde(default)]
    pub events: Vec<EmittedEvent>,
}

/// Event emitted by a contract during transaction execution
#[derive(Debug, Clone, Deserialize)]
pub struct EmittedEvent {
    pub contract: String,
    pub event: String,
    pub signer: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub data_indexed: Value,
}

/// Parse a numeric payload value into a positive amount.
///
/// Accepts JSON numbers, decimal strings, and Xian fixed-point objects.
/// Anything unparseable, non-finite, or non-positive maps to 0.0 so a bad
/// record scores zero instead of aborting the run.
pub fn parse_amount(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.parse().unwrap_or(0.0),
        Value::Object(map) => map
            .get("__fixed__")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0),
        _ => 0.0,
    };

    if parsed.is_finite() && parsed > 0.0 {
        parsed
    } else {
        0.0
    }
}

/// Read a named numeric field out of a kwargs/data object (0.0 if absent)
pub fn numeric_field(object: &Value, key: &str) -> f64 {
    object.get(key).map(parse_amount).unwrap_or(0.0)
}

/// Read a named string field out of a kwargs/data object
pub fn string_field<'a>(object: &'a Value, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}
