use anyhow::Result;
use std::sync::Arc;

use crate::record::Record;

pub mod adapter;
pub mod labels;

pub use adapter::TransformAdapter;
pub use labels::{parse_labels, Label};

/// Reserved line value that makes a worker flush its transformer instead of
/// parsing. Never valid log content.
pub const FLUSH_SIGNAL: &str = "!@#loglane-flush-signal#@!";

/// Stateful line-to-record transformation
///
/// Implementations may accumulate partial input across calls (multi-line
/// events). One instance is only ever driven by one thread at a time.
pub trait LineTransformer: Send {
    /// Feed one line. `Ok(None)` means the line was absorbed and nothing is
    /// ready to emit yet.
    fn consume(&mut self, line: &str) -> Result<Option<Record>>;

    /// Return whatever has been accumulated and reset. An empty record means
    /// nothing was pending.
    fn flush(&mut self) -> Record;
}

/// Builds a fresh transformer; invoked once per worker slot
pub type TransformerFactory = Arc<dyn Fn() -> Box<dyn LineTransformer> + Send + Sync>;

/// Wrap a closure as a [`TransformerFactory`]
pub fn factory<F, T>(build: F) -> TransformerFactory
where
    F: Fn() -> T + Send + Sync + 'static,
    T: LineTransformer + 'static,
{
    Arc::new(move || Box::new(build()) as Box<dyn LineTransformer>)
}
