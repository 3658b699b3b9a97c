//! Command-line execution
//!
//! Streams input sources through a [`BatchParser`] in fixed-size batches and
//! writes every record as a JSON line.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::cli::Cli;
use crate::config::{MapConf, KEY_TYPE};
use crate::decompression;
use crate::parallel::BatchParser;
use crate::parsers::{Registry, TYPE_MYSQL};
use crate::record::Record;
use crate::stats::ProcessingStats;

/// Resolve the parser configuration: config file first, command line on top
pub fn resolve_parser_conf(cli: &Cli, file_conf: MapConf) -> MapConf {
    let mut conf = file_conf;
    conf.merge(cli.parser_conf());
    if conf.get(KEY_TYPE).map_or(true, |kind| kind.trim().is_empty()) {
        conf.set(KEY_TYPE, TYPE_MYSQL);
    }
    conf
}

/// Run the command line: every source is parsed and flushed in turn
pub fn run<W: Write>(cli: &Cli, file_conf: MapConf, output: &mut W) -> Result<ProcessingStats> {
    let conf = resolve_parser_conf(cli, file_conf);
    let mut parser = Registry::default().new_parser(&conf)?;
    let batch_size = cli.batch_size.max(1);

    tracing::info!(
        parser = parser.kind(),
        workers = parser.workers(),
        batch_size,
        "parser ready"
    );

    let mut stats = ProcessingStats::new();

    for source in cli.sources() {
        let reader = decompression::open_input(&source)?;
        process_source(&mut parser, reader, batch_size, output, &mut stats)
            .with_context(|| format!("Failed to process {}", display_source(&source)))?;
        if source != "-" {
            stats.files_processed += 1;
        }
    }

    output.flush().context("Failed to flush output")?;
    stats.finish();
    Ok(stats)
}

/// Parse one source to the end and flush pending multi-line state
pub fn process_source<R: BufRead, W: Write>(
    parser: &mut BatchParser,
    mut reader: R,
    batch_size: usize,
    output: &mut W,
    stats: &mut ProcessingStats,
) -> Result<()> {
    let mut batch = Vec::with_capacity(batch_size);
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .context("Failed to read input line")?;
        if read == 0 {
            break;
        }

        // Undecodable bytes must not cost the rest of the input
        let line = String::from_utf8_lossy(&buffer);
        batch.push(line.trim_end_matches(|c: char| c == '\n' || c == '\r').to_string());

        if batch.len() >= batch_size {
            process_batch(parser, &batch, output, stats)?;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        process_batch(parser, &batch, output, stats)?;
    }

    let flushed = parser.flush();
    stats.records_output += flushed.len();
    stats.records_flushed += flushed.len();
    write_records(output, &flushed)
}

fn process_batch<W: Write>(
    parser: &mut BatchParser,
    batch: &[String],
    output: &mut W,
    stats: &mut ProcessingStats,
) -> Result<()> {
    let outcome = parser.parse(batch);
    stats.record_batch(batch.len(), outcome.records.len(), outcome.stats.as_ref());

    if let Some(batch_stats) = &outcome.stats {
        tracing::warn!(
            parser = parser.kind(),
            errors = batch_stats.error_count,
            last_error = %batch_stats.last_error,
            "batch contained lines that failed to parse"
        );
    }

    write_records(output, &outcome.records)
}

fn write_records<W: Write>(output: &mut W, records: &[Record]) -> Result<()> {
    for record in records {
        writeln!(output, "{}", record.to_json_line()).context("Failed to write record")?;
    }
    Ok(())
}

fn display_source(source: &str) -> &str {
    if source == "-" {
        "stdin"
    } else {
        source
    }
}
