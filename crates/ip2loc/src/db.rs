use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::codec;
use crate::error::{Error, Result, RowError};

/// Country name returned when no range contains the address.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// One `from..=to` interval of the database and the country it maps to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeoRange {
    pub from: u32,
    pub to: u32,
    pub country_code: String,
    pub country_name: String,
}

impl GeoRange {
    /// Build a range from the fields of one database row.
    ///
    /// Only the first four fields are read; IP2LOCATION-LITE-DB11 style rows
    /// carry region, city, coordinates and more after them.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> std::result::Result<GeoRange, RowError> {
        if fields.len() < 4 {
            return Err(RowError::NotEnoughFields);
        }

        let from = parse_bound(fields[0].as_ref())?;
        let to = parse_bound(fields[1].as_ref())?;
        if from > to {
            return Err(RowError::InvertedRange { from, to });
        }

        Ok(GeoRange {
            from,
            to,
            country_code: fields[2].as_ref().to_owned(),
            country_name: fields[3].as_ref().to_owned(),
        })
    }

    /// Whether the encoded address falls within this range, bounds included.
    #[inline(always)]
    pub fn contains(&self, n: u32) -> bool {
        self.from <= n && n <= self.to
    }
}

#[inline]
fn parse_bound(s: &str) -> std::result::Result<u32, RowError> {
    s.parse().map_err(|_| RowError::NotAnInteger(s.to_owned()))
}

/// An immutable, ordered list of [`GeoRange`]s.
#[derive(Clone, Debug, Default)]
pub struct GeoDb {
    ranges: Vec<GeoRange>,
}

impl GeoDb {
    /// Wrap already-built ranges, keeping their order.
    pub fn new(ranges: Vec<GeoRange>) -> GeoDb {
        GeoDb { ranges }
    }

    /// Parse a database from CSV content.
    ///
    /// Quoted fields are honoured, so `"Palestine, State of"` is one field.
    /// There is no header row. The first malformed row aborts the load.
    pub fn from_reader<R: Read>(rdr: R) -> Result<GeoDb> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(rdr);

        let mut ranges = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let row = idx as u64 + 1;
            let range = record
                .map_err(RowError::from)
                .and_then(|record| {
                    let fields: Vec<&str> = record.iter().collect();
                    GeoRange::from_fields(&fields)
                })
                .map_err(|kind| Error::Parse { row, kind })?;
            ranges.push(range);
        }

        Ok(GeoDb { ranges })
    }

    /// Open and parse a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<GeoDb> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let db = GeoDb::from_reader(io::BufReader::new(file)).map_err(|err| Error::Load {
            path: path.to_path_buf(),
            source: Box::new(err),
        })?;

        tracing::debug!(path = %path.display(), ranges = db.len(), "geo database loaded");
        Ok(db)
    }

    /// The ranges in load order.
    #[inline]
    pub fn ranges(&self) -> &[GeoRange] {
        &self.ranges
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Find the first range, in load order, containing the encoded address.
    #[inline]
    pub fn locate(&self, n: u32) -> Option<&GeoRange> {
        self.ranges.iter().find(|range| range.contains(n))
    }

    /// Resolve a dotted-decimal address to a country name.
    ///
    /// Returns [`UNKNOWN_COUNTRY`] when no range matches. A malformed address
    /// is an [`Error::Format`].
    pub fn resolve(&self, address: &str) -> Result<&str> {
        let n = codec::encode(address)?;
        Ok(self
            .locate(n)
            .map_or(UNKNOWN_COUNTRY, |range| range.country_name.as_str()))
    }
}
