mod common;
use common::*;

use loglane::pipeline::Label;
use loglane::{factory, BatchParser, LineTransformer, ParserConfig, Record, FLUSH_SIGNAL, KEY_RAW_DATA};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::{Arc, Barrier};

fn paragraph_parser(config: ParserConfig) -> BatchParser {
    BatchParser::new(config, factory(ParagraphTransformer::default))
}

/// Feed lines straight into one transformer, then flush it
fn sequential(input: &[String]) -> Vec<Record> {
    let mut transformer = ParagraphTransformer::default();
    let mut records: Vec<Record> = input
        .iter()
        .filter_map(|line| transformer.consume(line).unwrap())
        .collect();
    let last = transformer.flush();
    if !last.is_empty() {
        records.push(last);
    }
    records
}

#[test]
fn test_flushed_record_carries_raw_data_and_labels() {
    let config = ParserConfig::new("paragraph")
        .with_workers(1)
        .with_keep_raw_data(true)
        .with_labels(vec![Label::new("env", "prod")]);
    let mut parser = paragraph_parser(config);

    let outcome = parser.parse(&lines(&["alpha", "beta"]));
    assert!(outcome.records.is_empty());

    let flushed = parser.flush();
    assert_eq!(flushed.len(), 1);
    assert_eq!(flushed[0].get_str("text"), Some("alpha beta"));
    assert_eq!(flushed[0].get_str(KEY_RAW_DATA), Some("alpha\nbeta"));
    assert_eq!(flushed[0].get_str("env"), Some("prod"));
}

#[test]
fn test_raw_data_covers_every_line_of_a_multiline_record() {
    let config = ParserConfig::new("paragraph")
        .with_workers(1)
        .with_keep_raw_data(true);
    let mut parser = paragraph_parser(config);

    let outcome = parser.parse(&lines(&["x", "y", "---", "z", "---"]));
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].get_str(KEY_RAW_DATA), Some("x\ny\n---"));
    assert_eq!(outcome.records[1].get_str(KEY_RAW_DATA), Some("z\n---"));
}

#[test]
fn test_flush_signal_in_single_worker_emits_pending_state() {
    let mut parser = paragraph_parser(ParserConfig::new("paragraph").with_workers(1));

    // One slot, so the sentinel flushes exactly the state built so far
    let outcome = parser.parse(&lines(&["a", FLUSH_SIGNAL, FLUSH_SIGNAL]));
    assert_eq!(outcome.records.len(), 1);
    assert!(outcome.stats.is_none());
    assert!(parser.flush().is_empty());
}

/// Paragraph transformer whose first line blocks until every slot has one
struct GatedParagraph {
    gate: Option<Arc<Barrier>>,
    inner: ParagraphTransformer,
}

impl LineTransformer for GatedParagraph {
    fn consume(&mut self, line: &str) -> anyhow::Result<Option<Record>> {
        if let Some(gate) = self.gate.take() {
            gate.wait();
        }
        self.inner.consume(line)
    }

    fn flush(&mut self) -> Record {
        self.inner.flush()
    }
}

#[test]
fn test_flush_signal_only_flushes_receiving_worker() {
    let gate = Arc::new(Barrier::new(2));
    let mut parser = BatchParser::new(
        ParserConfig::new("paragraph").with_workers(2),
        factory(move || GatedParagraph {
            gate: Some(Arc::clone(&gate)),
            inner: ParagraphTransformer::default(),
        }),
    );

    // The gate forces one line into each slot
    let first = parser.parse(&lines(&["left", "right"]));
    assert!(first.records.is_empty());

    // A one-line batch runs on slot 0 only
    let signalled = parser.parse(&lines(&[FLUSH_SIGNAL]));
    assert_eq!(signalled.records.len(), 1);
    assert!(signalled.stats.is_none());

    let remaining = parser.flush();
    assert_eq!(remaining.len(), 1, "the other slot keeps its pending text");

    let seen: HashSet<&str> = signalled
        .records
        .iter()
        .chain(remaining.iter())
        .map(|r| r.get_str("text").unwrap())
        .collect();
    assert_eq!(seen, HashSet::from(["left", "right"]));
    assert!(parser.flush().is_empty());
}

#[test]
fn test_labels_override_parsed_fields() {
    let config = ParserConfig::new("paragraph")
        .with_workers(1)
        .with_labels(vec![Label::new("text", "label-wins")]);
    let mut parser = paragraph_parser(config);

    let outcome = parser.parse(&lines(&["parsed", "---"]));
    assert_eq!(outcome.records[0].get_str("text"), Some("label-wins"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_batch_with_flush_signal_matches_sequential(
        words in prop::collection::vec(prop_oneof![Just("---".to_string()), "[a-z]{1,6}"], 0..40),
    ) {
        let expected = sequential(&words);

        let mut parser = paragraph_parser(ParserConfig::new("paragraph").with_workers(1));
        let mut batch = words.clone();
        batch.push(FLUSH_SIGNAL.to_string());
        let outcome = parser.parse(&batch);

        prop_assert_eq!(outcome.records, expected);
        prop_assert!(parser.flush().is_empty());
    }

    #[test]
    fn prop_label_values_replace_parsed_fields(
        parsed in "[a-z]{1,8}",
        labelled in "[A-Z]{1,8}",
        extra in "[a-z]{1,8}",
    ) {
        let config = ParserConfig::new("paragraph")
            .with_workers(1)
            .with_labels(vec![Label::new("text", labelled.clone()), Label::new("extra", extra.clone())]);
        let mut parser = paragraph_parser(config);

        let outcome = parser.parse(&[parsed, "---".to_string()]);
        prop_assert_eq!(outcome.records.len(), 1);
        prop_assert_eq!(outcome.records[0].get_str("text"), Some(labelled.as_str()));
        prop_assert_eq!(outcome.records[0].get_str("extra"), Some(extra.as_str()));
    }
}
