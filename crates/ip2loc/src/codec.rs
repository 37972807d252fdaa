//! Dotted-decimal IPv4 text to and from its 32-bit integer form.
//!
//! The integer form is the one used by ip2location databases: the most
//! significant octet comes first, so `a.b.c.d` is `(a<<24)|(b<<16)|(c<<8)|d`.

use std::net::Ipv4Addr;

use crate::error::{Error, Result};

/// Encode a dotted-decimal IPv4 address as a `u32`.
///
/// The input must be exactly four dot-separated groups of ASCII digits, each
/// in `0..=255`. Leading zeros are accepted (`010.0.0.1` is `10.0.0.1`);
/// signs, whitespace and trailing text are not.
///
/// # Example
///
/// ```
/// assert_eq!(ip2loc::encode("127.0.0.1").unwrap(), (127 << 24) + 1);
/// assert!(ip2loc::encode("noise").is_err());
/// ```
#[inline]
pub fn encode(address: &str) -> Result<u32> {
    let mut octets = [0u8; 4];
    let mut parts = address.split('.');

    for octet in octets.iter_mut() {
        *octet = parts
            .next()
            .and_then(parse_octet)
            .ok_or_else(|| format_error(address))?;
    }

    if parts.next().is_some() {
        return Err(format_error(address));
    }

    Ok(u32::from_be_bytes(octets))
}

/// Decode the integer form back into an address.
#[inline]
pub fn decode(n: u32) -> Ipv4Addr {
    Ipv4Addr::from(n)
}

#[inline(always)]
fn parse_octet(part: &str) -> Option<u8> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn format_error(address: &str) -> Error {
    Error::Format {
        address: address.to_owned(),
    }
}
