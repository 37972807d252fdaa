use std::path::PathBuf;

/// Error types for database loading and address lookups.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The address is not four dot-separated decimal octets.
    #[error("'{address}' is not an IPv4")]
    Format { address: String },

    /// A database row could not be parsed. `row` is 1-based.
    #[error("row {row}: {kind}")]
    Parse { row: u64, kind: RowError },

    /// The database file could not be opened.
    #[error("failed to open database {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The database file was opened but its content is invalid.
    #[error("failed to load database {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

/// Why a single database row was rejected.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("not enough fields")]
    NotEnoughFields,

    #[error("'{0}' is not an integer")]
    NotAnInteger(String),

    #[error("inverted range {from}-{to}")]
    InvertedRange { from: u32, to: u32 },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results using the library error.
pub type Result<T> = std::result::Result<T, Error>;
