//! Range record parsing
//!
//! Turns one textual record into an [`IpRange`]. Two record shapes are
//! accepted, and in both the country code is the last field:
//!
//! ```text
//! 1.0.0.0, 1.0.0.255, AU        explicit start/end pair
//! 1.0.0.0, 1.0.0.255, x, y, AU  extra middle fields are ignored
//! 1.2.3.0/24, US                CIDR block
//! ```

use crate::address::{format_address, parse_address};
use crate::error::{RangeError, Result};
use serde::Serialize;
use std::fmt;

/// Widest IPv4 prefix length
const MAX_PREFIX_LEN: u8 = 32;

/// An inclusive address range mapped to a country code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpRange {
    /// First address in the range
    #[serde(serialize_with = "serialize_address")]
    pub start: u32,
    /// Last address in the range (inclusive)
    #[serde(serialize_with = "serialize_address")]
    pub end: u32,
    /// Country code
    pub country: String,
}

impl IpRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: u32, end: u32, country: impl Into<String>) -> Result<Self> {
        if start > end {
            return Err(RangeError::StructuralInvalid { start, end });
        }
        Ok(Self {
            start,
            end,
            country: country.into(),
        })
    }

    /// Whether `addr` lies within the closed interval `[start, end]`
    #[inline]
    pub fn contains(&self, addr: u32) -> bool {
        self.start <= addr && addr <= self.end
    }

    /// Number of addresses covered
    pub fn size(&self) -> u64 {
        u64::from(self.end.saturating_sub(self.start)) + 1
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {}",
            format_address(self.start),
            format_address(self.end),
            self.country
        )
    }
}

fn serialize_address<S: serde::Serializer>(
    addr: &u32,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_address(*addr))
}

/// Parse one raw record into a range
///
/// The parser does not check `start <= end` for explicit pairs; an inverted
/// range is returned as-is and left for the caller to reject.
///
/// # Example
/// ```
/// use geotree::range_parser::parse_record;
///
/// let range = parse_record(&["1.2.3.0/24", "US"])?;
/// assert_eq!(range.start, 0x0102_0300);
/// assert_eq!(range.end, 0x0102_03FF);
/// assert_eq!(range.country, "US");
/// # Ok::<(), geotree::RangeError>(())
/// ```
pub fn parse_record<S: AsRef<str>>(fields: &[S]) -> Result<IpRange> {
    if fields.len() < 2 {
        return Err(RangeError::format(format!(
            "record needs at least 2 fields, got {}",
            fields.len()
        )));
    }

    let first = fields[0].as_ref();
    let country = fields[fields.len() - 1].as_ref().trim();
    if country.is_empty() {
        return Err(RangeError::format("empty country code"));
    }

    let (start, end) = if first.contains('/') {
        parse_cidr(first)?
    } else {
        // Two fields in pair form means the end address doubles as the country
        if fields.len() < 3 {
            return Err(RangeError::format(format!(
                "record starting with '{}' has no end address",
                first.trim()
            )));
        }
        (parse_address(first)?, parse_address(fields[1].as_ref())?)
    };

    Ok(IpRange {
        start,
        end,
        country: country.to_string(),
    })
}

/// Parse `<ip>/<prefix>` into its first and last address
///
/// Host bits of the address are kept, so `1.2.3.7/24` spans
/// `1.2.3.7..=1.2.3.255`.
pub fn parse_cidr(text: &str) -> Result<(u32, u32)> {
    let (addr_str, prefix_str) = text
        .split_once('/')
        .ok_or_else(|| RangeError::format(format!("'{}' is not a CIDR block", text.trim())))?;

    let start = parse_address(addr_str)?;
    let prefix_str = prefix_str.trim();
    let prefix_len = prefix_str
        .parse::<u8>()
        .ok()
        .filter(|p| *p <= MAX_PREFIX_LEN && prefix_str.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| {
            RangeError::format(format!(
                "invalid prefix length '{}' (expected 0-{})",
                prefix_str, MAX_PREFIX_LEN
            ))
        })?;

    Ok((start, start | host_mask(prefix_len)))
}

/// Mask with the low `32 - prefix_len` bits set
#[inline]
fn host_mask(prefix_len: u8) -> u32 {
    u32::MAX
        .checked_shr(u32::from(prefix_len))
        .unwrap_or(0)
}
