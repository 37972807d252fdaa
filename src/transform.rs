//! The transform pipeline: extract, window, pick the client address, geolocate.

use std::io::{self, Write};

use ip2loc::GeoDb;

use crate::error::{Result, SchemaError};
use crate::extract::{Extracted, Extractor};
use crate::schema::Schema;
use crate::window::Window;

/// Columns the input schema must define for [`Transformer`].
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "domain", "date", "method", "path", "status", "version", "ip", "fw-ip", "values", "agent",
];

/// Columns of an [`OutputRecord`], in output order.
pub const OUTPUT_COLUMNS: [&str; 11] = [
    "domain", "date", "ts", "method", "path", "status", "version", "country", "ip", "values",
    "agent",
];

/// Whether an address field holds something worth geolocating.
///
/// Empty fields, the `-` placeholder and the loopback address written by a
/// local reverse proxy are not real client addresses.
#[inline]
pub fn is_real_ip(ip: &str) -> bool {
    !ip.is_empty() && ip != "127.0.0.1" && ip != "-"
}

/// Pick the client address: "ip" when it is real, otherwise "fw-ip" as is.
pub fn select_ip<'r, S: AsRef<str>>(
    record: &'r [S],
    schema: &Schema,
) -> std::result::Result<&'r str, SchemaError> {
    let ip = schema.get(record, "ip")?;
    if is_real_ip(ip) {
        Ok(ip)
    } else {
        schema.get(record, "fw-ip")
    }
}

/// A normalized access log record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputRecord {
    pub domain: String,
    pub date: String,
    /// Unix timestamp of `date`, in seconds.
    pub ts: String,
    pub method: String,
    pub path: String,
    pub status: String,
    pub version: String,
    /// Country name, empty when the address was not resolved.
    pub country: String,
    pub ip: String,
    pub values: String,
    pub agent: String,
}

impl OutputRecord {
    /// The fields in [`OUTPUT_COLUMNS`] order.
    pub fn fields(&self) -> [&str; 11] {
        [
            self.domain.as_str(),
            self.date.as_str(),
            self.ts.as_str(),
            self.method.as_str(),
            self.path.as_str(),
            self.status.as_str(),
            self.version.as_str(),
            self.country.as_str(),
            self.ip.as_str(),
            self.values.as_str(),
            self.agent.as_str(),
        ]
    }

    /// Write the record as one line, fields joined by `sep`.
    pub fn write<W: Write + ?Sized>(&self, wtr: &mut W, sep: &str) -> io::Result<()> {
        crate::output::write_fields(wtr, &self.fields(), sep)
    }
}

/// What became of one input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A skip pattern matched.
    Skipped,
    /// The record is outside the time window.
    Dropped,
    Record(OutputRecord),
}

/// Load-once configuration of the transform pipeline.
#[derive(Clone, Debug)]
pub struct Transformer {
    extractor: Extractor,
    schema: Schema,
    window: Window,
    db: GeoDb,
}

impl Transformer {
    /// Fails when `schema` lacks one of [`REQUIRED_COLUMNS`].
    pub fn new(extractor: Extractor, schema: Schema, window: Window, db: GeoDb) -> Result<Self> {
        schema.require(&REQUIRED_COLUMNS)?;
        Ok(Transformer {
            extractor,
            schema,
            window,
            db,
        })
    }

    /// Run one raw line through the whole pipeline.
    pub fn process(&self, line: &str) -> Result<Outcome> {
        let fields = match self.extractor.extract(line)? {
            Extracted::Skipped => return Ok(Outcome::Skipped),
            Extracted::Fields(fields) => fields,
        };

        Ok(match self.transform(&fields)? {
            Some(record) => Outcome::Record(record),
            None => Outcome::Dropped,
        })
    }

    /// Turn extracted fields into an output record, or `None` when the
    /// record is outside the time window.
    pub fn transform<S: AsRef<str>>(&self, fields: &[S]) -> Result<Option<OutputRecord>> {
        let Some(t) = self.window.accept(fields, &self.schema)? else {
            return Ok(None);
        };

        let ip = select_ip(fields, &self.schema)?;
        let country = if is_real_ip(ip) {
            self.db.resolve(ip)?.to_owned()
        } else {
            String::new()
        };

        let field = |name: &str| -> std::result::Result<String, SchemaError> {
            self.schema.get(fields, name).map(str::to_owned)
        };

        Ok(Some(OutputRecord {
            domain: field("domain")?,
            date: field("date")?,
            ts: itoa::Buffer::new().format(t.timestamp()).to_owned(),
            method: field("method")?,
            path: field("path")?,
            status: field("status")?,
            version: field("version")?,
            country,
            ip: ip.to_owned(),
            values: field("values")?,
            agent: field("agent")?,
        }))
    }
}
