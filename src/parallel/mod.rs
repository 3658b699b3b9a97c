//! Parallel batch processing for loglane
//!
//! Splits a batch across a pool of worker threads and reassembles the
//! results in input order.
//!
//! # Module Structure
//!
//! - `types`: Work items, tagged results and the batch outcome
//! - `batching`: Dispatch of a batch onto the work queue
//! - `worker`: Worker thread driving one transformer slot
//! - `sink`: Result collection and reordering
//! - `outcome`: Success/error/skip classification and statistics
//! - `processor`: Main BatchParser orchestration

mod batching;
mod outcome;
mod processor;
mod sink;
mod types;
mod worker;

// Re-export public types
pub use outcome::ErrorPolicy;
pub use processor::BatchParser;
pub use types::{BatchOutcome, WorkItem, WorkResult};
