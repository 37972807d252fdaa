//! Named access to the positional fields of a record.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result, SchemaError};

/// Maps column names to field positions.
///
/// Built once from a comma separated list such as
/// `domain,date,ts,method,path`. When a name appears twice the last
/// position wins.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    columns: Vec<String>,
    positions: FxHashMap<String, usize>,
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Schema
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut positions =
            FxHashMap::with_capacity_and_hasher(columns.len(), Default::default());
        for (n, name) in columns.iter().enumerate() {
            positions.insert(name.clone(), n);
        }
        Schema { columns, positions }
    }

    /// Parse a comma separated column list. An empty string is an empty schema.
    pub fn parse(list: &str) -> Schema {
        if list.is_empty() {
            return Schema::default();
        }
        Schema::new(list.split(','))
    }

    /// Column names in position order.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Look up a named field of `record`.
    #[inline]
    pub fn get<'r, S: AsRef<str>>(
        &self,
        record: &'r [S],
        name: &str,
    ) -> std::result::Result<&'r str, SchemaError> {
        let n = self
            .position(name)
            .ok_or_else(|| SchemaError::UnknownColumn {
                field: name.to_owned(),
            })?;
        record
            .get(n)
            .map(AsRef::as_ref)
            .ok_or_else(|| SchemaError::TooShort {
                field: name.to_owned(),
                len: record.len(),
            })
    }

    /// Fail with a configuration error unless every name is a column.
    pub fn require(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| self.position(name).is_none())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "schema lacks required column(s): {}",
                missing.join(", ")
            )))
        }
    }
}
