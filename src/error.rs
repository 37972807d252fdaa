/// Error types for the logtweak library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad flags, regexes or rule files. Always fatal.
    #[error("{0}")]
    Config(String),

    /// The rule file could not be read or decoded.
    #[error("cannot load rules from {path}")]
    Rules {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A line could not be split into fields or its timestamp read.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A field referenced by name is missing from the schema or the record.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The selected client address could not be geolocated.
    #[error(transparent)]
    Geo(#[from] ip2loc::Error),
}

/// Per-line parse failures.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The extraction regex did not match the line.
    #[error("regexp failed on line")]
    Unmatched,

    #[error("bad timestamp '{value}': {reason}")]
    Timestamp {
        value: String,
        reason: chrono::ParseError,
    },
}

/// A record does not fit the schema a rule or filter expects.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown column '{field}'")]
    UnknownColumn { field: String },

    #[error("not enough fields to reach '{field}' (record has {len})")]
    TooShort { field: String, len: usize },
}

impl Error {
    /// Whether this error means the configuration and the input disagree.
    pub fn is_schema(&self) -> bool {
        matches!(self, Error::Schema(_))
    }
}

/// Convenience type alias for Results using the library error.
pub type Result<T> = std::result::Result<T, Error>;
