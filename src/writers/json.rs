//! Generic structured-JSON writer.

use serde_json::{Map, Value};

use super::{ConfigWriter, sorted, to_pretty_bytes};
use crate::error::Result;

/// Writes the value tree as pretty JSON with canonically sorted keys.
pub struct JsonWriter;

impl ConfigWriter for JsonWriter {
    fn format(&self) -> &'static str {
        "json"
    }

    fn write(&self, values: &Map<String, Value>) -> Result<Vec<u8>> {
        to_pretty_bytes(&sorted(&Value::Object(values.clone())))
    }
}
