//! Type definitions for parallel processing
//!
//! Contains the unit of work handed to workers and the tagged result they
//! send back.

use crate::record::Record;
use crate::stats::BatchStatistics;

/// One line of a batch, tagged with its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub index: usize,
    pub line: String,
}

/// Outcome of processing exactly one [`WorkItem`]
#[derive(Debug)]
pub struct WorkResult {
    pub index: usize,
    /// Line as the worker saw it (after optional trimming); empty means
    /// "no content at this position"
    pub line: String,
    pub record: Record,
    pub error: Option<anyhow::Error>,
}

impl WorkResult {
    pub fn skipped(index: usize) -> Self {
        Self {
            index,
            line: String::new(),
            record: Record::new(),
            error: None,
        }
    }
}

/// Records emitted for one batch plus statistics when any line failed
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<Record>,
    pub stats: Option<BatchStatistics>,
}

impl BatchOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_clean(&self) -> bool {
        self.stats.is_none()
    }
}
