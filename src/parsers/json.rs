use anyhow::{anyhow, Context, Result};

use crate::pipeline::LineTransformer;
use crate::record::Record;

/// One JSON object per line
pub struct JsonTransformer;

impl JsonTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineTransformer for JsonTransformer {
    fn consume(&mut self, line: &str) -> Result<Option<Record>> {
        let value: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse JSON: {}", line))?;

        match value {
            serde_json::Value::Object(map) => Ok(Some(Record::from(map))),
            other => Err(anyhow!("Expected JSON object, got: {}", other)),
        }
    }

    fn flush(&mut self) -> Record {
        Record::new()
    }
}
