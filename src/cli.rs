// CLI-specific types and structures
// This module contains the command-line interface definitions

use clap::{ArgAction, Parser};

use crate::config::{
    MapConf, KEY_DISABLE_RECORD_ERRDATA, KEY_KEEP_RAW_DATA, KEY_LABELS, KEY_NAME, KEY_TRIM_SPACE,
    KEY_TYPE, KEY_WORKERS,
};

pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Parser, Debug, Clone)]
#[command(name = "loglane")]
#[command(version)]
#[command(about = "Parse log files into JSON lines with an order-preserving parallel worker pool")]
#[command(args_override_self = true)]
pub struct Cli {
    /// Input files (stdin if not specified, or use "-" to explicitly specify stdin)
    pub files: Vec<String>,

    /// Parser type: mysqllog (default), json, raw
    #[arg(short = 't', long = "type", help_heading = "Parser Options")]
    pub parser_type: Option<String>,

    /// Parser name, used in diagnostics
    #[arg(long = "name", help_heading = "Parser Options")]
    pub name: Option<String>,

    /// Constant field added to every record, as "<name> <value>" (repeatable)
    #[arg(short = 'l', long = "label", help_heading = "Parser Options")]
    pub labels: Vec<String>,

    /// Do not emit a stash record for lines that fail to parse
    #[arg(long = "disable-record-errdata", help_heading = "Parser Options")]
    pub disable_record_errdata: bool,

    /// Attach the verbatim source lines to every record
    #[arg(long = "keep-raw-data", help_heading = "Parser Options")]
    pub keep_raw_data: bool,

    /// Pass lines to the parser without trimming surrounding whitespace
    #[arg(long = "no-trim", help_heading = "Parser Options")]
    pub no_trim: bool,

    /// Number of worker threads (default: number of CPUs)
    #[arg(short = 'j', long = "workers", help_heading = "Performance Options")]
    pub workers: Option<usize>,

    /// Lines per batch
    #[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE, help_heading = "Performance Options")]
    pub batch_size: usize,

    /// Write records to a file instead of stdout
    #[arg(short = 'o', long = "output-file", help_heading = "Output Options")]
    pub output_file: Option<String>,

    /// Print processing statistics to stderr when done
    #[arg(short = 's', long = "stats", help_heading = "Output Options")]
    pub stats: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, help_heading = "Output Options")]
    pub verbose: u8,

    /// Read configuration from this file instead of the default locations
    #[arg(long = "config-file", help_heading = "Configuration Options")]
    pub config_file: Option<String>,

    /// Do not load any configuration file
    #[arg(long = "ignore-config", help_heading = "Configuration Options")]
    pub ignore_config: bool,

    /// Show configuration file locations and active settings, then exit
    #[arg(long = "show-config", help_heading = "Configuration Options")]
    pub show_config: bool,
}

impl Cli {
    /// Parser keys set on the command line. Flags that were not given are
    /// left out so config-file values survive.
    pub fn parser_conf(&self) -> MapConf {
        let mut conf = MapConf::new();

        if let Some(kind) = &self.parser_type {
            conf.set(KEY_TYPE, kind.as_str());
        }
        if let Some(name) = &self.name {
            conf.set(KEY_NAME, name.as_str());
        }
        if !self.labels.is_empty() {
            conf.set(KEY_LABELS, self.labels.join(","));
        }
        if self.disable_record_errdata {
            conf.set(KEY_DISABLE_RECORD_ERRDATA, "true");
        }
        if self.keep_raw_data {
            conf.set(KEY_KEEP_RAW_DATA, "true");
        }
        if self.no_trim {
            conf.set(KEY_TRIM_SPACE, "false");
        }
        if let Some(workers) = self.workers {
            conf.set(KEY_WORKERS, workers.to_string());
        }

        conf
    }

    /// Input sources, stdin when none were given
    pub fn sources(&self) -> Vec<String> {
        if self.files.is_empty() {
            vec!["-".to_string()]
        } else {
            self.files.clone()
        }
    }
}

/// Find `--config-file` before full argument parsing
pub fn extract_config_file_arg(args: &[String]) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config-file" {
            return iter.next().cloned();
        }
        if let Some(path) = arg.strip_prefix("--config-file=") {
            return Some(path.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("loglane").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parser_conf_only_contains_given_flags() {
        let cli = parse(&["-t", "json", "slow.log"]);
        let conf = cli.parser_conf();
        assert_eq!(conf.get(KEY_TYPE), Some("json"));
        assert_eq!(conf.get(KEY_KEEP_RAW_DATA), None);
        assert_eq!(conf.get(KEY_WORKERS), None);
        assert_eq!(cli.sources(), vec!["slow.log"]);
    }

    #[test]
    fn test_labels_and_flags() {
        let cli = parse(&[
            "-l",
            "env prod",
            "-l",
            "dc fra1",
            "--keep-raw-data",
            "--disable-record-errdata",
            "--no-trim",
            "-j",
            "4",
        ]);
        let conf = cli.parser_conf();
        assert_eq!(conf.get(KEY_LABELS), Some("env prod,dc fra1"));
        assert_eq!(conf.get(KEY_KEEP_RAW_DATA), Some("true"));
        assert_eq!(conf.get(KEY_DISABLE_RECORD_ERRDATA), Some("true"));
        assert_eq!(conf.get(KEY_TRIM_SPACE), Some("false"));
        assert_eq!(conf.get(KEY_WORKERS), Some("4"));
        assert_eq!(cli.sources(), vec!["-"]);
    }

    #[test]
    fn test_later_flags_override_config_defaults() {
        let cli = parse(&["--batch-size", "10", "--batch-size", "20"]);
        assert_eq!(cli.batch_size, 20);
    }

    #[test]
    fn test_extract_config_file_arg() {
        let args: Vec<String> = ["loglane", "--config-file", "a.ini", "x.log"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(extract_config_file_arg(&args).as_deref(), Some("a.ini"));

        let args = vec!["loglane".to_string(), "--config-file=b.ini".to_string()];
        assert_eq!(extract_config_file_arg(&args).as_deref(), Some("b.ini"));

        assert_eq!(extract_config_file_arg(&["loglane".to_string()]), None);
    }
}
