use anyhow::Result;

use crate::pipeline::LineTransformer;
use crate::record::Record;

/// Wraps each line unchanged in a `raw` field
pub struct RawTransformer;

impl RawTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RawTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineTransformer for RawTransformer {
    fn consume(&mut self, line: &str) -> Result<Option<Record>> {
        let mut record = Record::with_capacity(1);
        record.set_field("raw", line);
        Ok(Some(record))
    }

    fn flush(&mut self) -> Record {
        Record::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_transformer_preserves_backslashes() {
        let mut transformer = RawTransformer::new();
        let line = "Line with backslash\\ and\ttab";
        let record = transformer.consume(line).unwrap().unwrap();
        assert_eq!(record.get_str("raw"), Some(line));
        assert!(transformer.flush().is_empty());
    }
}
