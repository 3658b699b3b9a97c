// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;

use loglane::{LineTransformer, Record};

/// Run loglane with given arguments and input via stdin
pub fn run_loglane_with_input(args: &[&str], input: &str) -> (String, String, i32) {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_loglane"))
        .arg("--ignore-config")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start loglane");

    if let Some(stdin) = cmd.stdin.as_mut() {
        stdin
            .write_all(input.as_bytes())
            .expect("Failed to write to stdin");
    }

    let output = cmd.wait_with_output().expect("Failed to read output");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Run loglane with a temporary file appended as the last argument
pub fn run_loglane_with_file(args: &[&str], file_content: &str) -> (String, String, i32) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file
        .write_all(file_content.as_bytes())
        .expect("Failed to write to temp file");

    let mut full_args = args.to_vec();
    full_args.push(temp_file.path().to_str().unwrap());

    run_loglane_with_args(&full_args)
}

/// Run loglane without stdin input
pub fn run_loglane_with_args(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_loglane"))
        .arg("--ignore-config")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute loglane");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Parse JSON lines output into values
pub fn parse_json_lines(output: &str) -> Vec<serde_json::Value> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("Output line should be valid JSON"))
        .collect()
}

pub fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Emits `{"n": <line>}`. Lines of the form `<n>:<micros>` sleep first so
/// workers finish out of order; `bad` fails and `boom` panics.
#[derive(Default)]
pub struct JitterTransformer;

impl LineTransformer for JitterTransformer {
    fn consume(&mut self, line: &str) -> Result<Option<Record>> {
        if line.contains("boom") {
            panic!("exploded on {}", line);
        }
        if line.contains("bad") {
            return Err(anyhow!("cannot parse {}", line));
        }
        if let Some((_, micros)) = line.split_once(':') {
            if let Ok(micros) = micros.parse::<u64>() {
                thread::sleep(Duration::from_micros(micros));
            }
        }

        let mut record = Record::new();
        record.set_field("n", line);
        record.set_field("thread", format!("{:?}", thread::current().id()));
        Ok(Some(record))
    }

    fn flush(&mut self) -> Record {
        Record::new()
    }
}

/// Collects lines into paragraphs; `---` closes the current paragraph
#[derive(Default)]
pub struct ParagraphTransformer {
    pending: Vec<String>,
}

impl LineTransformer for ParagraphTransformer {
    fn consume(&mut self, line: &str) -> Result<Option<Record>> {
        if line == "---" {
            let record = self.flush();
            return Ok((!record.is_empty()).then_some(record));
        }
        self.pending.push(line.to_string());
        Ok(None)
    }

    fn flush(&mut self) -> Record {
        let mut record = Record::new();
        if !self.pending.is_empty() {
            record.set_field("text", self.pending.join(" "));
            self.pending.clear();
        }
        record
    }
}
