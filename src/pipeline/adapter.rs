use anyhow::Result;

use super::labels::{apply_labels, Label};
use super::{LineTransformer, FLUSH_SIGNAL};
use crate::record::{Record, KEY_RAW_DATA};

/// Per-worker wrapper around a [`LineTransformer`].
///
/// Owns the raw-line buffer used for `keep_raw_data`, routes the flush signal
/// and stamps labels onto every non-empty record.
pub struct TransformAdapter {
    inner: Box<dyn LineTransformer>,
    labels: Vec<Label>,
    keep_raw_data: bool,
    raw_lines: Vec<String>,
}

impl TransformAdapter {
    pub fn new(inner: Box<dyn LineTransformer>, labels: Vec<Label>, keep_raw_data: bool) -> Self {
        Self {
            inner,
            labels,
            keep_raw_data,
            raw_lines: Vec::new(),
        }
    }

    /// Transform one line. An empty record means "nothing to emit yet".
    pub fn parse(&mut self, line: &str) -> Result<Record> {
        if line == FLUSH_SIGNAL {
            return Ok(self.flush());
        }

        if self.keep_raw_data {
            self.raw_lines.push(line.to_string());
        }

        match self.inner.consume(line) {
            Ok(Some(record)) => Ok(self.finish(record)),
            Ok(None) => Ok(Record::new()),
            Err(err) => {
                // The error record carries this line already
                if self.keep_raw_data {
                    self.raw_lines.pop();
                }
                Err(err)
            }
        }
    }

    /// Flush the wrapped transformer, finishing any pending record. The raw
    /// buffer is empty afterwards even when nothing was pending.
    pub fn flush(&mut self) -> Record {
        let record = self.inner.flush();
        let record = self.finish(record);
        self.raw_lines.clear();
        record
    }

    /// Lines buffered for raw retention since the last emitted record
    pub fn pending_raw_lines(&self) -> usize {
        self.raw_lines.len()
    }

    fn finish(&mut self, mut record: Record) -> Record {
        if record.is_empty() {
            return record;
        }

        apply_labels(&mut record, &self.labels);

        if self.keep_raw_data {
            record.set_field(KEY_RAW_DATA, self.raw_lines.join("\n"));
            self.raw_lines.clear();
        }

        record
    }
}
