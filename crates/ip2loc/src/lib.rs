//! IPv4 geolocation against an ip2location-style range database.
//!
//! `ip2loc` loads a CSV file of `from,to,country_code,country_name[,...]` rows,
//! where `from` and `to` are IPv4 addresses encoded as base-10 integers, and
//! resolves dotted-decimal addresses to country names.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ip2loc::GeoDb;
//!
//! # fn main() -> Result<(), ip2loc::Error> {
//! let db = GeoDb::open("/etc/ip2location.csv")?;
//! println!("{}", db.resolve("1.0.3.200")?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Lookup policy
//!
//! Lookups are a linear scan in load order and the first range containing the
//! address wins. Overlapping ranges are neither rejected nor merged, so the
//! order of the database file is significant. Addresses outside every range
//! resolve to [`UNKNOWN_COUNTRY`].

pub mod codec;
mod db;
mod error;

pub use codec::{decode, encode};
pub use db::{GeoDb, GeoRange, UNKNOWN_COUNTRY};
pub use error::{Error, Result, RowError};
