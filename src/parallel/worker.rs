//! Worker thread for parallel processing
//!
//! Each worker drains the shared work queue with its own adapter and sends
//! one tagged result per item.

use anyhow::anyhow;
use crossbeam_channel::{Receiver, Sender};
use std::panic::{self, AssertUnwindSafe};

use crate::pipeline::TransformAdapter;

use super::types::{WorkItem, WorkResult};

/// Worker loop: runs until the work queue is closed and empty
pub(crate) fn worker_thread(
    worker_id: usize,
    work_receiver: Receiver<WorkItem>,
    result_sender: Sender<WorkResult>,
    adapter: &mut TransformAdapter,
    trim_space: bool,
) {
    let mut processed = 0usize;

    while let Ok(item) = work_receiver.recv() {
        let result = process_item(worker_id, item, adapter, trim_space);
        processed += 1;

        if result_sender.send(result).is_err() {
            // Collector is gone, nothing left to report to
            break;
        }
    }

    tracing::trace!(worker_id, processed, "worker finished");
}

fn process_item(
    worker_id: usize,
    item: WorkItem,
    adapter: &mut TransformAdapter,
    trim_space: bool,
) -> WorkResult {
    let WorkItem { index, line } = item;
    let line = if trim_space {
        line.trim().to_string()
    } else {
        line
    };

    if line.is_empty() {
        return WorkResult::skipped(index);
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| adapter.parse(&line)));

    match outcome {
        Ok(Ok(record)) => WorkResult {
            index,
            line,
            record,
            error: None,
        },
        Ok(Err(error)) => WorkResult {
            index,
            line,
            record: Default::default(),
            error: Some(error),
        },
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(worker_id, index, %message, "transformer panicked");
            WorkResult {
                index,
                line,
                record: Default::default(),
                error: Some(anyhow!("transformer panicked: {}", message)),
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
