//! Format writer registry.
//!
//! A writer translates a semantic value tree into one file format's bytes.
//! Writers are deterministic (identical input produces byte-identical
//! output, which is what makes regenerate-and-compare idempotence work) and
//! total over well-formed input.

mod iterm2;
mod json;
mod raw;

pub mod colors;

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// One file format's serializer.
pub trait ConfigWriter: Send + Sync {
    /// Format identifier used in `files` directives.
    fn format(&self) -> &'static str;

    /// Render the value tree into file content.
    fn write(&self, values: &Map<String, Value>) -> Result<Vec<u8>>;
}

static REGISTRY: LazyLock<BTreeMap<&'static str, Box<dyn ConfigWriter>>> = LazyLock::new(|| {
    let writers: Vec<Box<dyn ConfigWriter>> = vec![
        Box::new(json::JsonWriter),
        Box::new(raw::RawWriter),
        Box::new(iterm2::ITerm2Writer),
    ];
    writers.into_iter().map(|w| (w.format(), w)).collect()
});

/// Look up a writer by format name.
pub fn writer_for(format: &str) -> Result<&'static dyn ConfigWriter> {
    REGISTRY
        .get(format)
        .map(|writer| writer.as_ref())
        .ok_or_else(|| Error::UnsupportedFormat {
            format: format.to_string(),
            available: formats().join(", "),
        })
}

/// All registered format names, sorted.
pub fn formats() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}

/// Render a directive's value tree through the named writer.
///
/// A `null` tree renders like an empty map; any other non-object tree is
/// rejected before the writer runs.
pub fn write(format: &str, values: &Value) -> Result<Vec<u8>> {
    let writer = writer_for(format)?;
    match values {
        Value::Object(map) => writer.write(map),
        Value::Null => writer.write(&Map::new()),
        other => Err(Error::InvalidValues {
            key: "values".to_string(),
            reason: format!("expected an object, got {}", value_kind(other)),
        }),
    }
}

/// Recursively sort object keys so serialization is canonical.
pub(crate) fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered: BTreeMap<&String, &Value> = map.iter().collect();
            Value::Object(
                ordered
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sorted(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

pub(crate) fn to_pretty_bytes(value: &Value) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|err| Error::InvalidValues {
        key: "values".to_string(),
        reason: err.to_string(),
    })
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
