//! Known log formats: extraction regex, skip patterns and schemas.

use crate::transform::OUTPUT_COLUMNS;

/// OpenBSD httpd(8) access log in "forwarded" style: the common log format
/// followed by the `X-Forwarded-For` and `X-Forwarded-Port` values.
const HTTPD_FW_PATTERN: &str = r#"^([^ ]+) ([^ ]+) ([^ ]+) ([^ ]+) \[([^\]]+)\] "([^ ]+) (?:([^ \?]*)(\?[^ ]*)?(?: ([^"]+))?)?" ([0-9]+) ([0-9]+) "([^"]*)" "(.*)" (-|[0-9\.]+) (-|[0-9]+)$"#;

/// Capture groups of [`HTTPD_FW_PATTERN`], in order.
const HTTPD_FW_COLUMNS: [&str; 15] = [
    "domain", "ip", "?", "user?", "date", "method", "path", "values", "version", "status", "size",
    "referer?", "agent", "fw-ip", "??",
];

/// newsyslog(8) rotation notices interleaved with the access log.
const NEWSYSLOG_TURNOVER: &str =
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}.\d*Z .* logfile turned over$";

/// A log source format with a ready-made configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Preset {
    /// OpenBSD httpd(8), forwarded log style.
    OpenbsdHttpdFw,
}

impl Preset {
    /// Regex whose capture groups are [`Preset::input_columns`].
    pub fn input_pattern(self) -> &'static str {
        match self {
            Preset::OpenbsdHttpdFw => HTTPD_FW_PATTERN,
        }
    }

    /// Lines to drop before extraction.
    pub fn skip_patterns(self) -> &'static [&'static str] {
        match self {
            Preset::OpenbsdHttpdFw => &[NEWSYSLOG_TURNOVER],
        }
    }

    /// Schema of the raw log lines.
    pub fn input_columns(self) -> &'static [&'static str] {
        match self {
            Preset::OpenbsdHttpdFw => &HTTPD_FW_COLUMNS,
        }
    }

    /// Schema of the lines `logtweak` writes for this format, which is what
    /// `logtag` reads.
    pub fn output_columns(self) -> &'static [&'static str] {
        match self {
            Preset::OpenbsdHttpdFw => &OUTPUT_COLUMNS,
        }
    }
}
