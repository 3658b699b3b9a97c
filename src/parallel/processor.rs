//! Batch parser
//!
//! Orchestrates dispatch, the worker pool, collection and classification for
//! one batch at a time.

use crossbeam_channel::unbounded;
use std::thread;

use crate::config::ParserConfig;
use crate::pipeline::{TransformAdapter, TransformerFactory};
use crate::record::Record;

use super::batching::{dispatch, effective_workers};
use super::outcome::{classify, ErrorPolicy};
use super::sink::collect_results;
use super::types::BatchOutcome;
use super::worker::worker_thread;

/// Order-preserving parallel parser.
///
/// Holds one [`TransformAdapter`] per configured worker. During a batch,
/// worker `i` has exclusive use of slot `i`, so transformer state is never
/// shared between threads. Slots outlive the batch: an event still being
/// assembled in a slot is completed by a later batch or by [`flush`].
///
/// A flush signal line only flushes the slot of the worker that receives it.
///
/// [`flush`]: BatchParser::flush
pub struct BatchParser {
    config: ParserConfig,
    slots: Vec<TransformAdapter>,
    policy: ErrorPolicy,
}

impl BatchParser {
    pub fn new(config: ParserConfig, factory: TransformerFactory) -> Self {
        let workers = config.workers.max(1);
        let slots = (0..workers)
            .map(|_| TransformAdapter::new(factory(), config.labels.clone(), config.keep_raw_data))
            .collect();
        let policy = ErrorPolicy {
            disable_record_err_data: config.disable_record_err_data,
            keep_raw_data: config.keep_raw_data,
        };

        Self {
            config,
            slots,
            policy,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn kind(&self) -> &str {
        &self.config.kind
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Configured pool size
    pub fn workers(&self) -> usize {
        self.slots.len()
    }

    /// Transform a batch, returning records in input order.
    ///
    /// Never fails as a whole: failing lines are reported through the
    /// statistics, which are present only if at least one line failed.
    pub fn parse(&mut self, lines: &[String]) -> BatchOutcome {
        let workers = effective_workers(self.slots.len(), lines.len());
        if workers == 0 {
            return BatchOutcome::empty();
        }

        tracing::debug!(
            parser = %self.config.name,
            lines = lines.len(),
            workers,
            "dispatching batch"
        );

        let work_receiver = dispatch(lines);
        let (result_sender, result_receiver) = unbounded();
        let trim_space = self.config.trim_space;
        let slots = &mut self.slots[..workers];

        let results = thread::scope(|scope| {
            for (worker_id, adapter) in slots.iter_mut().enumerate() {
                let work_receiver = work_receiver.clone();
                let result_sender = result_sender.clone();
                scope.spawn(move || {
                    worker_thread(worker_id, work_receiver, result_sender, adapter, trim_space)
                });
            }

            // Workers hold the remaining senders; the channel closes when the last exits
            drop(result_sender);
            collect_results(result_receiver, lines.len(), workers)
        });

        let outcome = classify(results, self.policy);

        if let Some(stats) = &outcome.stats {
            tracing::debug!(
                parser = %self.config.name,
                records = outcome.records.len(),
                errors = stats.error_count,
                skipped = stats.skipped_indices.len(),
                "batch finished with errors"
            );
        } else {
            tracing::debug!(
                parser = %self.config.name,
                records = outcome.records.len(),
                "batch finished"
            );
        }

        outcome
    }

    /// Flush every slot in slot order, returning the records that were still
    /// pending. Calling it again without new input returns nothing.
    pub fn flush(&mut self) -> Vec<Record> {
        let records: Vec<Record> = self
            .slots
            .iter_mut()
            .map(TransformAdapter::flush)
            .filter(|record| !record.is_empty())
            .collect();

        tracing::debug!(
            parser = %self.config.name,
            records = records.len(),
            "flushed pending state"
        );
        records
    }
}
