//! Raw text writer.
//!
//! Used for scripts, plain text files, or any content that should be
//! emitted exactly as written in the directive:
//!
//! ```yaml
//! values:
//!   content: |
//!     # literal file content
//! ```

use serde_json::{Map, Value};

use super::{ConfigWriter, value_kind};
use crate::error::{Error, Result};

pub struct RawWriter;

impl ConfigWriter for RawWriter {
    fn format(&self) -> &'static str {
        "raw"
    }

    fn write(&self, values: &Map<String, Value>) -> Result<Vec<u8>> {
        match values.get("content") {
            Some(Value::String(content)) => Ok(content.clone().into_bytes()),
            Some(other) => Err(Error::InvalidValues {
                key: "content".to_string(),
                reason: format!("expected a string, got {}", value_kind(other)),
            }),
            None => Err(Error::InvalidValues {
                key: "content".to_string(),
                reason: "missing".to_string(),
            }),
        }
    }
}
