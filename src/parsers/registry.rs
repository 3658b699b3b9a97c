use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

use crate::config::{MapConf, ParserConfig, KEY_TYPE};
use crate::parallel::BatchParser;
use crate::pipeline::{factory, TransformerFactory};

use super::{JsonTransformer, MysqlSlowLogTransformer, RawTransformer};

pub const TYPE_MYSQL: &str = "mysqllog";
pub const TYPE_JSON: &str = "json";
pub const TYPE_RAW: &str = "raw";

/// Builds the per-worker transformer factory for one parser type
pub type Constructor = fn(&MapConf) -> Result<TransformerFactory>;

/// Parser types known by name
pub struct Registry {
    constructors: BTreeMap<String, Constructor>,
}

impl Registry {
    /// Registry without any parser types
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Registry with the built-in parser types
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(TYPE_MYSQL, |_| Ok(factory(MysqlSlowLogTransformer::new)));
        registry.register(TYPE_JSON, |_| Ok(factory(JsonTransformer::new)));
        registry.register(TYPE_RAW, |_| Ok(factory(RawTransformer::new)));
        registry
    }

    /// Register a constructor, returning the one it replaced
    pub fn register(&mut self, kind: &str, constructor: Constructor) -> Option<Constructor> {
        self.constructors.insert(kind.to_string(), constructor)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered type names, sorted
    pub fn kinds(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    pub fn factory(&self, kind: &str, conf: &MapConf) -> Result<TransformerFactory> {
        let constructor = self.constructors.get(kind).ok_or_else(|| {
            anyhow!(
                "unknown parser type '{}' (known types: {})",
                kind,
                self.kinds().join(", ")
            )
        })?;
        constructor(conf)
    }

    /// Build a parser from key/value configuration; `type` selects the transformer
    pub fn new_parser(&self, conf: &MapConf) -> Result<BatchParser> {
        let config = ParserConfig::from_conf(conf)?;
        if config.kind.is_empty() {
            return Err(anyhow!("missing required key '{}'", KEY_TYPE));
        }
        let factory = self.factory(&config.kind, conf)?;
        Ok(BatchParser::new(config, factory))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
