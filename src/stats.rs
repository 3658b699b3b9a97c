use std::fmt;
use std::time::{Duration, Instant};

/// Per-batch accounting returned alongside the records of a batch that had at
/// least one failing line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStatistics {
    pub success_count: usize,
    pub error_count: usize,
    /// Batch positions that produced no output, ascending
    pub skipped_indices: Vec<usize>,
    pub last_error: String,
}

impl BatchStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_success(&mut self) {
        self.success_count += 1;
    }

    pub fn add_error(&mut self, message: String) {
        self.error_count += 1;
        self.last_error = message;
    }

    pub fn add_skipped(&mut self, index: usize) {
        self.skipped_indices.push(index);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

impl fmt::Display for BatchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines parsed, {} failed, {} skipped",
            self.success_count,
            self.error_count,
            self.skipped_indices.len()
        )?;
        if !self.last_error.is_empty() {
            write!(f, "; last error: {}", self.last_error)?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchStatistics {}

/// Totals accumulated by the command-line runner across every batch
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    pub lines_read: usize,
    pub batches: usize,
    pub records_output: usize,
    pub records_flushed: usize,
    pub errors: usize,
    pub skipped: usize,
    pub files_processed: usize,
    pub last_error: Option<String>,
    pub processing_time: Duration,
    pub start_time: Option<Instant>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Fold one batch into the totals. Error-free batches carry no
    /// statistics, so only their output size is known.
    pub fn record_batch(&mut self, lines: usize, records: usize, stats: Option<&BatchStatistics>) {
        self.lines_read += lines;
        self.batches += 1;
        self.records_output += records;

        if let Some(stats) = stats {
            self.errors += stats.error_count;
            self.skipped += stats.skipped_indices.len();
            if !stats.last_error.is_empty() {
                self.last_error = Some(stats.last_error.clone());
            }
        }
    }

    pub fn finish(&mut self) {
        if let Some(start) = self.start_time {
            self.processing_time = start.elapsed();
        }
    }

    pub fn format_stats(&self) -> String {
        let mut output = format!(
            "Lines processed: {} total in {} batches; Records output: {}",
            self.lines_read, self.batches, self.records_output
        );

        if self.records_flushed > 0 {
            output.push_str(&format!(" ({} from final flush)", self.records_flushed));
        }

        if self.files_processed > 0 {
            output.push_str(&format!(", {} files", self.files_processed));
        }

        if self.errors > 0 {
            output.push_str(&format!(", {} errors", self.errors));
        }

        if self.skipped > 0 {
            output.push_str(&format!(", {} skipped", self.skipped));
        }

        let processing_time_ms = self.processing_time.as_millis();
        output.push_str(&format!(" in {}ms", processing_time_ms));

        if processing_time_ms > 0 && self.lines_read > 0 {
            let lines_per_sec = (self.lines_read as f64 * 1000.0) / processing_time_ms as f64;
            output.push_str(&format!(" ({:.0} lines/s)", lines_per_sec));
        }

        if let Some(last_error) = &self.last_error {
            output.push_str(&format!("\nLast error: {}", last_error));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_statistics_display() {
        let mut stats = BatchStatistics::new();
        stats.add_success();
        stats.add_error("bad header".to_string());
        stats.add_skipped(1);

        assert!(stats.has_errors());
        assert_eq!(
            stats.to_string(),
            "1 lines parsed, 1 failed, 1 skipped; last error: bad header"
        );
    }

    #[test]
    fn test_last_error_tracks_most_recent() {
        let mut stats = BatchStatistics::new();
        stats.add_error("first".to_string());
        stats.add_error("second".to_string());
        assert_eq!(stats.error_count, 2);
        assert_eq!(stats.last_error, "second");
    }

    #[test]
    fn test_processing_stats_accumulates_batches() {
        let mut totals = ProcessingStats::new();
        totals.record_batch(10, 10, None);

        let batch = BatchStatistics {
            success_count: 3,
            error_count: 2,
            skipped_indices: vec![0, 4],
            last_error: "oops".to_string(),
        };
        totals.record_batch(7, 5, Some(&batch));

        assert_eq!(totals.lines_read, 17);
        assert_eq!(totals.batches, 2);
        assert_eq!(totals.records_output, 15);
        assert_eq!(totals.errors, 2);
        assert_eq!(totals.skipped, 2);

        let summary = totals.format_stats();
        assert!(summary.starts_with("Lines processed: 17 total in 2 batches; Records output: 15"));
        assert!(summary.contains("2 errors"));
        assert!(summary.contains("Last error: oops"));
    }
}
