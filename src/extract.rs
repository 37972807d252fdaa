use std::borrow::Cow;

use regex::Regex;

use crate::error::{Error, ParseError, Result};

/// Default input and output field separator (U+241C, SYMBOL FOR FILE SEPARATOR).
pub const DEFAULT_SEPARATOR: &str = "␜";

/// How a line is cut into fields.
#[derive(Clone, Debug)]
enum Mode {
    /// Split on a fixed string.
    Separator(String),
    /// Capture groups of a regex.
    Pattern(Regex),
}

/// The result of running a line through an [`Extractor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extracted {
    /// A skip pattern matched; the line is silently dropped.
    Skipped,
    /// The fields of the line, in order.
    Fields(Vec<String>),
}

/// Turns raw lines into field sequences.
#[derive(Clone, Debug)]
pub struct Extractor {
    mode: Mode,
    skips: Vec<Regex>,
    output_separator: String,
}

impl Extractor {
    /// Check the skip patterns, then extract the fields of `line`.
    ///
    /// A pattern that does not match the line is a [`ParseError::Unmatched`].
    pub fn extract(&self, line: &str) -> Result<Extracted> {
        if self.is_skipped(line) {
            return Ok(Extracted::Skipped);
        }

        let fields = match &self.mode {
            Mode::Separator(sep) => line.split(sep.as_str()).map(str::to_owned).collect(),
            Mode::Pattern(re) => {
                let caps = re.captures(line).ok_or(ParseError::Unmatched)?;
                caps.iter()
                    .skip(1)
                    .map(|m| m.map_or_else(String::new, |m| m.as_str().to_owned()))
                    .collect()
            }
        };

        Ok(Extracted::Fields(fields))
    }

    /// Whether any skip pattern matches the line.
    ///
    /// Occurrences of the output separator are removed from the line before
    /// matching, so that separators injected into a field do not hide a line
    /// that should be skipped.
    pub fn is_skipped(&self, line: &str) -> bool {
        if self.skips.is_empty() {
            return false;
        }

        let sep = self.output_separator.as_str();
        let stripped = if sep.is_empty() || !line.contains(sep) {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(line.replace(sep, ""))
        };

        self.skips.iter().any(|re| re.is_match(&stripped))
    }

    /// Whether fields come from regex capture groups.
    #[inline]
    pub fn is_pattern(&self) -> bool {
        matches!(self.mode, Mode::Pattern(_))
    }
}

/// Builder for an [`Extractor`].
///
/// Without a pattern the extractor splits on the input separator.
#[derive(Clone, Debug)]
pub struct ExtractorBuilder {
    separator: String,
    output_separator: String,
    pattern: Option<String>,
    skips: Vec<String>,
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorBuilder {
    /// Create a builder splitting on [`DEFAULT_SEPARATOR`] with no skip patterns.
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            output_separator: DEFAULT_SEPARATOR.to_string(),
            pattern: None,
            skips: Vec::new(),
        }
    }

    /// Input field separator, used when no pattern is set.
    pub fn separator(&mut self, sep: &str) -> &mut Self {
        self.separator = sep.to_string();
        self
    }

    /// Output field separator, stripped from lines before skip matching.
    pub fn output_separator(&mut self, sep: &str) -> &mut Self {
        self.output_separator = sep.to_string();
        self
    }

    /// Extract with the capture groups of this regex instead of splitting.
    pub fn pattern(&mut self, re: &str) -> &mut Self {
        self.pattern = Some(re.to_string());
        self
    }

    /// Add a skip pattern.
    pub fn skip(&mut self, re: &str) -> &mut Self {
        self.skips.push(re.to_string());
        self
    }

    /// Add several skip patterns.
    pub fn skips<I, S>(&mut self, res: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.skips
            .extend(res.into_iter().map(|re| re.as_ref().to_string()));
        self
    }

    /// Compile the patterns.
    pub fn build(&self) -> Result<Extractor> {
        let mode = match &self.pattern {
            Some(re) => Mode::Pattern(
                Regex::new(re).map_err(|e| Error::Config(format!("ire: bad regexp: {e}")))?,
            ),
            None if self.separator.is_empty() => {
                return Err(Error::Config("input field separator is empty".to_string()));
            }
            None => Mode::Separator(self.separator.clone()),
        };

        let skips = self
            .skips
            .iter()
            .map(|re| Regex::new(re).map_err(|e| Error::Config(format!("skip: bad regexp: {e}"))))
            .collect::<Result<Vec<_>>>()?;

        Ok(Extractor {
            mode,
            skips,
            output_separator: self.output_separator.clone(),
        })
    }
}
