//! Result collection for parallel processing
//!
//! Drains worker output and restores batch order.

use crossbeam_channel::Receiver;

use super::types::WorkResult;

/// Drain the result channel until every worker has hung up, then restore
/// input order.
///
/// A single worker already delivers results in submission order, so the sort
/// is only needed when several workers raced.
pub(crate) fn collect_results(
    result_receiver: Receiver<WorkResult>,
    expected: usize,
    workers: usize,
) -> Vec<WorkResult> {
    let mut results = Vec::with_capacity(expected);
    results.extend(result_receiver.iter());

    if workers > 1 {
        // stable, so equal keys keep arrival order
        results.sort_by_key(|result| result.index);
    }

    debug_assert_eq!(results.len(), expected, "every work item yields one result");
    results
}
