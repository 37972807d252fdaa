//! The tagging pipeline: ordered rules appending one tag field to a record.

use crate::error::SchemaError;
use crate::rules::Rule;
use crate::schema::Schema;

/// Default separator between tags in the tag field.
pub const DEFAULT_TAG_SEPARATOR: &str = ",";

/// Load-once configuration of the tagging pipeline.
#[derive(Clone, Debug)]
pub struct Tagger {
    schema: Schema,
    rules: Vec<Rule>,
    separator: String,
}

impl Tagger {
    pub fn new(schema: Schema, rules: Vec<Rule>, separator: &str) -> Tagger {
        Tagger {
            schema,
            rules,
            separator: separator.to_string(),
        }
    }

    /// Collect the tags of the rules matching `record`.
    ///
    /// Rules are tried in order. A matching rule without its continue flag
    /// ends the evaluation.
    pub fn tags<'t, S: AsRef<str>>(
        &'t self,
        record: &[S],
    ) -> Result<Vec<&'t str>, SchemaError> {
        let mut tags = Vec::new();
        for rule in &self.rules {
            if !rule.matches(&self.schema, record)? {
                continue;
            }
            tags.extend(rule.tags.iter().map(String::as_str));
            if !rule.proceed {
                break;
            }
        }
        Ok(tags)
    }

    /// Append the joined tags to `record` as one more field.
    ///
    /// The field is empty when no rule matched.
    pub fn tag(&self, mut record: Vec<String>) -> Result<Vec<String>, SchemaError> {
        let field = self.tags(&record)?.join(&self.separator);
        record.push(field);
        Ok(record)
    }
}
