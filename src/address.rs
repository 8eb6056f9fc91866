//! Dotted-quad IPv4 address conversion
//!
//! Addresses are plain `u32` values with the first octet in the most
//! significant byte, so numeric order matches address order.

use crate::error::{RangeError, Result};

/// Number of octets in an IPv4 address
const OCTETS: usize = 4;

/// Parse a dotted-quad string into a 32-bit address
///
/// Each of the four components may carry surrounding whitespace and must be a
/// base-10 integer in `0..=255`.
///
/// # Example
/// ```
/// use geotree::address::parse_address;
///
/// assert_eq!(parse_address("1.2.3.4")?, 0x0102_0304);
/// assert!(parse_address("1.2.3").is_err());
/// # Ok::<(), geotree::RangeError>(())
/// ```
pub fn parse_address(text: &str) -> Result<u32> {
    let text = text.trim();
    if text.is_empty() {
        return Err(RangeError::format("empty address"));
    }

    let mut addr = 0u32;
    let mut count = 0;
    for part in text.split('.') {
        count += 1;
        if count > OCTETS {
            break;
        }
        let octet = parse_octet(part)
            .ok_or_else(|| RangeError::format(format!("invalid octet '{}' in '{}'", part, text)))?;
        addr = (addr << 8) | u32::from(octet);
    }

    if count != OCTETS {
        return Err(RangeError::format(format!(
            "expected {} octets in '{}'",
            OCTETS, text
        )));
    }

    Ok(addr)
}

fn parse_octet(part: &str) -> Option<u8> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Digits only, so overflow is the only remaining failure (e.g. "999")
    part.parse::<u8>().ok()
}

/// Render a 32-bit address as a dotted quad
pub fn format_address(addr: u32) -> String {
    let [a, b, c, d] = addr.to_be_bytes();
    format!("{}.{}.{}.{}", a, b, c, d)
}
