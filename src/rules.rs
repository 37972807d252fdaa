//! Tagging rules and their JSON rule file.
//!
//! A rule file is one JSON array:
//!
//! ```json
//! [
//!   {"exprs": {"path": "^/wp-", "status": "^404$"}, "tags": ["scan", "wordpress"]},
//!   {"exprs": {"agent": "(?i)bot"}, "tags": ["bot"], "continue": true},
//!   {"exprs": {}, "tags": ["other"]}
//! ]
//! ```
//!
//! Patterns are compiled when the file is loaded. Field names are only
//! checked against the schema when a record is tagged.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result, SchemaError};
use crate::schema::Schema;

/// A compiled field predicate.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "String")]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(re: &str) -> std::result::Result<Pattern, regex::Error> {
        Regex::new(re).map(Pattern)
    }

    #[inline]
    pub fn matches(&self, value: &str) -> bool {
        self.0.is_match(value)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Pattern {
    type Error = regex::Error;

    fn try_from(re: String) -> std::result::Result<Self, Self::Error> {
        Pattern::new(&re)
    }
}

/// Tags to emit when every predicate holds.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Rule {
    /// Field name to pattern. All must match; an empty map always matches.
    #[serde(default, alias = "Exprs")]
    pub exprs: BTreeMap<String, Pattern>,

    #[serde(default, alias = "Tags")]
    pub tags: Vec<String>,

    /// Keep evaluating the following rules after this one matched.
    #[serde(default, rename = "continue", alias = "Continue")]
    pub proceed: bool,
}

impl Rule {
    /// Test the rule against a record.
    ///
    /// Predicates are tried until the first one that fails. A predicate on a
    /// field the record cannot provide is an error, not a mismatch.
    pub fn matches<S: AsRef<str>>(
        &self,
        schema: &Schema,
        record: &[S],
    ) -> std::result::Result<bool, SchemaError> {
        for (field, pattern) in &self.exprs {
            if !pattern.matches(schema.get(record, field)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Decode a rule file's content.
pub fn parse_rules(json: &str) -> std::result::Result<Vec<Rule>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read and decode a rule file.
pub fn load_rules<P: AsRef<Path>>(path: P) -> Result<Vec<Rule>> {
    let path = path.as_ref();
    let rules_error = |source: Box<dyn std::error::Error + Send + Sync>| Error::Rules {
        path: path.display().to_string(),
        source,
    };

    let json = fs::read_to_string(path).map_err(|e| rules_error(e.into()))?;
    let rules = parse_rules(&json).map_err(|e| rules_error(e.into()))?;

    tracing::debug!(path = %path.display(), rules = rules.len(), "rules loaded");
    Ok(rules)
}
