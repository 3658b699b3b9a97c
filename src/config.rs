use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;

use crate::pipeline::{parse_labels, Label};

pub const KEY_TYPE: &str = "type";
pub const KEY_NAME: &str = "name";
pub const KEY_LABELS: &str = "labels";
pub const KEY_DISABLE_RECORD_ERRDATA: &str = "disable_record_errdata";
pub const KEY_KEEP_RAW_DATA: &str = "keep_raw_data";
pub const KEY_WORKERS: &str = "workers";
pub const KEY_TRIM_SPACE: &str = "trim_space";

/// Static configuration of a [`crate::BatchParser`]
#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub name: String,
    /// Registry name of the transformer
    pub kind: String,
    pub labels: Vec<Label>,
    pub disable_record_err_data: bool,
    pub keep_raw_data: bool,
    /// Configured pool size; a batch uses at most this many workers
    pub workers: usize,
    /// Trim surrounding whitespace before transforming; blank lines are skipped
    pub trim_space: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: String::new(),
            labels: Vec::new(),
            disable_record_err_data: false,
            keep_raw_data: false,
            workers: default_workers(),
            trim_space: true,
        }
    }
}

/// Worker count used when none is configured
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}

impl ParserConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_disable_record_err_data(mut self, disable: bool) -> Self {
        self.disable_record_err_data = disable;
        self
    }

    pub fn with_keep_raw_data(mut self, keep: bool) -> Self {
        self.keep_raw_data = keep;
        self
    }

    pub fn with_trim_space(mut self, trim: bool) -> Self {
        self.trim_space = trim;
        self
    }

    /// Build from plugin-style key/value configuration
    pub fn from_conf(conf: &MapConf) -> Result<Self> {
        let workers = match conf.get_usize_or(KEY_WORKERS, 0)? {
            0 => default_workers(),
            n => n,
        };

        Ok(Self {
            name: conf.get_string_or(KEY_NAME, ""),
            kind: conf.get_string_or(KEY_TYPE, ""),
            labels: parse_labels(&conf.get_string_list_or(KEY_LABELS, &[])),
            disable_record_err_data: conf.get_bool_or(KEY_DISABLE_RECORD_ERRDATA, false)?,
            keep_raw_data: conf.get_bool_or(KEY_KEEP_RAW_DATA, false)?,
            workers,
            trim_space: conf.get_bool_or(KEY_TRIM_SPACE, true)?,
        })
    }
}

/// String key/value configuration as read from config files or hosts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapConf {
    values: HashMap<String, String>,
}

impl MapConf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay `other` onto this configuration, `other` winning on conflicts
    pub fn merge(&mut self, other: MapConf) {
        self.values.extend(other.values);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.values.iter()
    }

    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| default.to_string())
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(default),
            Some(value) => parse_bool(value)
                .ok_or_else(|| anyhow!("invalid boolean for '{}': {}", key, value)),
        }
    }

    pub fn get_usize_or(&self, key: &str, default: usize) -> Result<usize> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(default),
            Some(value) => value
                .parse()
                .with_context(|| format!("invalid number for '{}': {}", key, value)),
        }
    }

    /// Comma-separated list; surrounding whitespace and empty items are dropped
    pub fn get_string_list_or(&self, key: &str, default: &[&str]) -> Vec<String> {
        match self.get(key) {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
            None => default.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapConf {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
