//! Work dispatch for a single batch
//!
//! Tags every line with its batch position and queues it for the workers.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::types::WorkItem;

/// Number of workers a batch of `line_count` lines gets
pub(crate) fn effective_workers(configured: usize, line_count: usize) -> usize {
    configured.max(1).min(line_count)
}

/// Queue every line in submission order and close the queue.
///
/// The channel is unbounded so the whole batch is enqueued before any worker
/// has to make progress; dropping the sender lets workers see end-of-batch.
pub(crate) fn dispatch(lines: &[String]) -> Receiver<WorkItem> {
    let (work_sender, work_receiver) = unbounded();
    send_all(lines, &work_sender);
    drop(work_sender);
    work_receiver
}

fn send_all(lines: &[String], work_sender: &Sender<WorkItem>) {
    for (index, line) in lines.iter().enumerate() {
        let item = WorkItem {
            index,
            line: line.clone(),
        };
        // The receiver is held by the caller, so sending cannot fail here
        if work_sender.send(item).is_err() {
            break;
        }
    }
}
