//! Disposition of ordered worker results
//!
//! Decides, per line, whether it succeeded, failed or was skipped, and builds
//! the batch output and statistics.

use crate::record::{Record, KEY_RAW_DATA, KEY_STASH};
use crate::stats::BatchStatistics;

use super::types::{BatchOutcome, WorkResult};

/// How failing lines are represented in the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorPolicy {
    /// Drop the stash record normally emitted for a failing line
    pub disable_record_err_data: bool,
    /// Attach the raw line to error records (and emit one even when stash
    /// records are disabled)
    pub keep_raw_data: bool,
}

impl ErrorPolicy {
    /// Build the record emitted for a failing line, if any
    fn error_record(&self, line: String) -> Option<Record> {
        if self.disable_record_err_data && !self.keep_raw_data {
            return None;
        }

        let mut record = Record::with_capacity(2);
        if !self.disable_record_err_data {
            record.set_field(KEY_STASH, line.clone());
        }
        if self.keep_raw_data {
            record.set_field(KEY_RAW_DATA, line);
        }
        Some(record)
    }
}

/// Classify results that are already in batch order
pub(crate) fn classify(results: Vec<WorkResult>, policy: ErrorPolicy) -> BatchOutcome {
    let mut records = Vec::with_capacity(results.len());
    let mut stats = BatchStatistics::new();

    for result in results {
        if result.line.is_empty() {
            stats.add_skipped(result.index);
            continue;
        }

        if let Some(error) = result.error {
            stats.add_error(error.to_string());
            match policy.error_record(result.line) {
                Some(record) => records.push(record),
                None => stats.add_skipped(result.index),
            }
            continue;
        }

        if result.record.is_empty() {
            continue;
        }

        stats.add_success();
        records.push(result.record);
    }

    BatchOutcome {
        records,
        stats: stats.has_errors().then_some(stats),
    }
}
