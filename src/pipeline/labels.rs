use std::collections::HashSet;

use crate::record::Record;

/// Constant field merged into every record a parser emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parse `"<name> <value>"` label specs.
///
/// Entries with fewer than two whitespace-separated tokens are dropped, and
/// the first occurrence of a name wins.
pub fn parse_labels<S: AsRef<str>>(specs: &[S]) -> Vec<Label> {
    let mut seen = HashSet::new();
    let mut labels = Vec::with_capacity(specs.len());

    for spec in specs {
        let mut parts = spec.as_ref().split_whitespace();
        let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        if !seen.insert(name.to_string()) {
            continue;
        }
        labels.push(Label::new(name, value));
    }

    labels
}

/// Write every label into the record, replacing parsed fields of the same name
pub fn apply_labels(record: &mut Record, labels: &[Label]) {
    for label in labels {
        record.set_field(label.name.clone(), label.value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels_basic() {
        let labels = parse_labels(&["env prod", "region eu-west-1"]);
        assert_eq!(
            labels,
            vec![Label::new("env", "prod"), Label::new("region", "eu-west-1")]
        );
    }

    #[test]
    fn test_parse_labels_skips_incomplete_and_duplicate() {
        let labels = parse_labels(&["lonely", "env prod", "env staging", "  ", "dc  fra1  extra"]);
        assert_eq!(
            labels,
            vec![Label::new("env", "prod"), Label::new("dc", "fra1")]
        );
    }

    #[test]
    fn test_apply_labels_overwrites() {
        let mut record = Record::new();
        record.set_field("env", "parsed");
        record.set_field("User", "root");
        apply_labels(&mut record, &[Label::new("env", "prod")]);

        assert_eq!(record.get_str("env"), Some("prod"));
        assert_eq!(record.get_str("User"), Some("root"));
    }
}
