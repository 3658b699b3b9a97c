// Core library for the loglane log parsing tool

pub mod cli;
pub mod config;
pub mod config_file;
pub mod decompression;
pub mod parallel;
pub mod parsers;
pub mod pipeline;
pub mod record;
pub mod runner;
pub mod stats;

pub use config::{MapConf, ParserConfig};
pub use parallel::{BatchOutcome, BatchParser, ErrorPolicy};
pub use parsers::Registry;
pub use pipeline::{factory, LineTransformer, TransformerFactory, FLUSH_SIGNAL};
pub use record::{Record, KEY_RAW_DATA, KEY_STASH};
pub use stats::{BatchStatistics, ProcessingStats};
