//! Shared response parser.
//!
//! Every endpoint wraps its results in the same envelope:
//! `{ "data": [ ... ] }`, with the median-expression endpoint optionally
//! carrying a sibling `clusters` object when hierarchical clustering was
//! requested. This module turns a raw body into that envelope and decodes
//! the data array into typed records.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{GtexError, Result};

/// Newick-format cluster strings returned alongside median expression data.
#[derive(Debug, Clone, Deserialize)]
pub struct Clusters {
    pub gene: String,
    pub tissue: String,
}

/// The decoded response envelope.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub data: Vec<Value>,
    pub clusters: Option<Clusters>,
}

/// Decode a raw body into the `data` envelope.
pub fn envelope(body: &str) -> Result<Envelope> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| GtexError::malformed(format!("invalid JSON: {e}")))?;

    let object = root
        .as_object()
        .ok_or_else(|| GtexError::malformed("top-level value is not an object"))?;

    let data = match object.get("data") {
        Some(Value::Array(items)) => items.clone(),
        Some(other) => {
            return Err(GtexError::malformed(format!(
                "`data` is not an array (got {})",
                type_name(other)
            )))
        }
        None => return Err(GtexError::malformed("missing `data` key in envelope")),
    };

    let clusters = match object.get("clusters") {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| GtexError::malformed(format!("unreadable `clusters` object: {e}")))?,
        None => None,
    };

    Ok(Envelope { data, clusters })
}

/// Deserialize every element of the data array into `T`.
pub fn records<T: DeserializeOwned>(envelope: &Envelope) -> Result<Vec<T>> {
    envelope
        .data
        .iter()
        .map(|item| {
            serde_json::from_value(item.clone())
                .map_err(|e| GtexError::malformed(format!("unreadable record: {e}")))
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
