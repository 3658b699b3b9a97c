use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::pipeline::LineTransformer;
use crate::record::Record;

static USER_HOST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^User@Host:\s*([^\[\s]*)\s*\[([^\]]*)\]\s*@\s*([^\[\s]*)\s*\[([^\]]*)\](?:\s+Id:\s*(\d+))?")
        .expect("valid User@Host regex")
});

static HEADER_PAIR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z_]+):\s+(\S+)").expect("valid header pair regex"));

static SET_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^SET\s+timestamp\s*=\s*(\d+)\s*;?\s*$").expect("valid timestamp regex")
});

static USE_DATABASE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^use\s+`?([^`;\s]+)`?\s*;\s*$").expect("valid use regex"));

/// Header keys that must carry a number
const NUMERIC_KEYS: &[&str] = &[
    "Query_time",
    "Lock_time",
    "Rows_sent",
    "Rows_examined",
    "Rows_affected",
    "Bytes_sent",
];

/// MySQL slow-query log transformer.
///
/// An event is a run of `#` header lines followed by statement lines; it is
/// complete when the next header arrives or on flush.
#[derive(Debug, Default)]
pub struct MysqlSlowLogTransformer {
    pending: Record,
    statement: Vec<String>,
    in_statement: bool,
}

impl MysqlSlowLogTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    fn has_pending(&self) -> bool {
        !self.pending.is_empty() || !self.statement.is_empty()
    }

    fn take_event(&mut self) -> Record {
        let mut event = std::mem::take(&mut self.pending);
        if !self.statement.is_empty() {
            event.set_field("Statement", self.statement.join("\n"));
            self.statement.clear();
        }
        self.in_statement = false;
        event
    }

    fn consume_statement_line(&mut self, line: &str) {
        self.in_statement = true;
        let trimmed = line.trim();

        if let Some(caps) = SET_TIMESTAMP_REGEX.captures(trimmed) {
            if let Ok(ts) = caps[1].parse::<i64>() {
                self.pending.set_field("Timestamp", ts);
                return;
            }
        }

        if self.statement.is_empty() {
            if let Some(caps) = USE_DATABASE_REGEX.captures(trimmed) {
                self.pending.set_field("Database", caps[1].to_string());
                return;
            }
        }

        self.statement.push(line.to_string());
    }
}

impl LineTransformer for MysqlSlowLogTransformer {
    fn consume(&mut self, line: &str) -> Result<Option<Record>> {
        if is_server_banner(line) {
            return Ok(None);
        }

        if let Some(header) = line.strip_prefix('#') {
            // Validate first so a bad header leaves the pending event intact
            let fields = parse_header(header.trim())?;
            let completed = if self.in_statement {
                Some(self.take_event())
            } else {
                None
            };
            for (key, value) in fields {
                self.pending.set_field(key, value);
            }
            return Ok(completed);
        }

        if !self.has_pending() {
            return Err(anyhow!(
                "statement line outside of a slow query event: {}",
                truncate(line, 80)
            ));
        }

        self.consume_statement_line(line);
        Ok(None)
    }

    fn flush(&mut self) -> Record {
        self.take_event()
    }
}

/// Lines mysqld writes when it (re)opens the slow log
fn is_server_banner(line: &str) -> bool {
    (line.contains(", Version: ") && line.trim_end().ends_with("started with:"))
        || line.starts_with("Tcp port:")
        || (line.starts_with("Time ") && line.contains("Id Command"))
}

fn parse_header(body: &str) -> Result<Vec<(String, Value)>> {
    if let Some(time) = body.strip_prefix("Time:") {
        return Ok(vec![("Time".to_string(), Value::from(normalize_time(time.trim())))]);
    }

    if body.starts_with("User@Host:") {
        return parse_user_host(body);
    }

    let mut fields = Vec::new();
    for caps in HEADER_PAIR_REGEX.captures_iter(body) {
        let key = &caps[1];
        let raw = &caps[2];
        let value = match parse_number(raw) {
            Some(number) => number,
            None if NUMERIC_KEYS.contains(&key) => {
                return Err(anyhow!("invalid value for {}: {}", key, raw));
            }
            None => Value::from(raw),
        };
        fields.push((key.to_string(), value));
    }

    // Free-form comment lines carry no fields
    Ok(fields)
}

fn parse_user_host(body: &str) -> Result<Vec<(String, Value)>> {
    let caps = USER_HOST_REGEX
        .captures(body)
        .ok_or_else(|| anyhow!("malformed User@Host header: {}", truncate(body, 80)))?;

    let user = if caps[2].is_empty() { &caps[1] } else { &caps[2] };
    let host = if caps[3].is_empty() { &caps[4] } else { &caps[3] };

    let mut fields = vec![
        ("User".to_string(), Value::from(user)),
        ("Host".to_string(), Value::from(host)),
    ];
    if let Some(id) = caps.get(5).and_then(|m| m.as_str().parse::<i64>().ok()) {
        fields.push(("Id".to_string(), Value::from(id)));
    }
    Ok(fields)
}

fn parse_number(raw: &str) -> Option<Value> {
    if let Ok(int) = raw.parse::<i64>() {
        return Some(Value::from(int));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::from)
}

/// Normalise both slow-log time styles to RFC 3339-like text; unknown
/// formats are kept verbatim
fn normalize_time(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.to_rfc3339();
    }

    // Pre-5.7 style: "230101 12:00:00" or "230101  2:05:09"
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Ok(dt) = NaiveDateTime::parse_from_str(&collapsed, "%y%m%d %H:%M:%S") {
        return dt.format("%Y-%m-%dT%H:%M:%S").to_string();
    }

    raw.to_string()
}

fn truncate(line: &str, max_chars: usize) -> String {
    if line.chars().count() <= max_chars {
        line.to_string()
    } else {
        let head: String = line.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
