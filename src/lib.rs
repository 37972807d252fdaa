//! The logtweak library: normalize, geolocate, time-filter and tag web
//! server log lines.
//!
//! Two pipelines share the field extraction and schema concepts:
//!
//! - [`Transformer`] turns raw access log lines into fixed-shape records,
//!   dropping lines outside a time window and resolving the client address
//!   to a country with an [`ip2loc::GeoDb`].
//! - [`Tagger`] runs an ordered list of regex [`Rule`]s over a record and
//!   appends the tags of the matching rules as one more field.
//!
//! # Examples
//!
//! Normalizing an OpenBSD httpd log line:
//!
//! ```rust,no_run
//! use ip2loc::GeoDb;
//! use logtweak::{ExtractorBuilder, Outcome, Preset, Schema, Transformer, Window};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let preset = Preset::OpenbsdHttpdFw;
//! let extractor = ExtractorBuilder::new()
//!     .pattern(preset.input_pattern())
//!     .skips(preset.skip_patterns())
//!     .build()?;
//! let transformer = Transformer::new(
//!     extractor,
//!     Schema::new(preset.input_columns().iter().copied()),
//!     Window::from_dates("2022-07-01", "2022-07-31")?,
//!     GeoDb::open("/etc/ip2location.csv")?,
//! )?;
//!
//! let line = r#"example.org 8.8.8.8 - - [23/Jul/2022:09:34:25 +0200] "GET / HTTP/1.1" 200 512 "" "curl" - -"#;
//! if let Outcome::Record(record) = transformer.process(line)? {
//!     println!("{} {}", record.ip, record.country);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod error;
pub mod extract;
pub mod input;
pub mod output;
pub mod preset;
pub mod rules;
pub mod schema;
pub mod tag;
pub mod transform;
pub mod window;

pub use crate::error::{Error, ParseError, Result, SchemaError};
pub use crate::extract::{Extracted, Extractor, ExtractorBuilder};
pub use crate::preset::Preset;
pub use crate::rules::{load_rules, Pattern, Rule};
pub use crate::schema::Schema;
pub use crate::tag::Tagger;
pub use crate::transform::{Outcome, OutputRecord, Transformer};
pub use crate::window::Window;
