//! Inclusive time window applied to the "date" field of a record.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{Error, ParseError, Result};
use crate::schema::Schema;

/// Timestamp layout of httpd access logs, e.g. `23/Jul/2022:09:09:58 +0200`.
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Layout of the `--begin`/`--end` bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DEFAULT_BEGIN: &str = "1900-01-01";
pub const DEFAULT_END: &str = "3000-01-01";

/// Parse a log timestamp in [`TIMESTAMP_FORMAT`].
pub fn parse_timestamp(value: &str) -> std::result::Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|reason| ParseError::Timestamp {
        value: value.to_owned(),
        reason,
    })
}

/// A `[begin, end]` interval, both ends included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Default for Window {
    fn default() -> Self {
        // Both constants are well formed
        Window::from_dates(DEFAULT_BEGIN, DEFAULT_END).unwrap_or(Window {
            begin: DateTime::<Utc>::MIN_UTC,
            end: DateTime::<Utc>::MAX_UTC,
        })
    }
}

impl Window {
    /// Build a window from two `YYYY-MM-DD` days: from the first second of
    /// `begin` to the last second of `end`, in UTC.
    pub fn from_dates(begin: &str, end: &str) -> Result<Window> {
        let day = |flag: &str, value: &str, time: NaiveTime| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(|date| Utc.from_utc_datetime(&date.and_time(time)))
                .map_err(|e| Error::Config(format!("--{flag} incorrect format: '{value}': {e}")))
        };

        let midnight = NaiveTime::MIN;
        let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(midnight);

        Ok(Window {
            begin: day("begin", begin, midnight)?,
            end: day("end", end, last_second)?,
        })
    }

    #[inline]
    pub fn begin(&self) -> DateTime<Utc> {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `t` lies within the window.
    #[inline]
    pub fn contains<Tz: TimeZone>(&self, t: &DateTime<Tz>) -> bool {
        let t = t.with_timezone(&Utc);
        self.begin <= t && t <= self.end
    }

    /// Parse the "date" field of `record` and test it against the window.
    ///
    /// Returns the parsed instant when the record is inside the window and
    /// `None` when it must be dropped.
    pub fn accept<S: AsRef<str>>(
        &self,
        record: &[S],
        schema: &Schema,
    ) -> Result<Option<DateTime<FixedOffset>>> {
        let t = parse_timestamp(schema.get(record, "date")?)?;
        Ok(self.contains(&t).then_some(t))
    }
}
