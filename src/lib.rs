//! Geotree - IPv4 Range Tree for Country Lookups
//!
//! Geotree resolves IPv4 addresses to country codes using a static set of
//! address ranges. Ranges are parsed from text records (start/end pairs or
//! CIDR blocks), sorted by start address, and arranged into a balanced binary
//! search tree that answers point lookups in O(log n).
//!
//! # Quick Start
//!
//! ```rust
//! use geotree::RangeTree;
//!
//! let tree = RangeTree::new([
//!     vec!["1.0.0.0", "1.0.0.255", "AU"],
//!     vec!["1.1.1.0", "1.1.1.255", "CN"],
//!     vec!["2.0.0.0", "2.255.255.255", "FR"],
//!     vec!["210.0.0.0/8", "KR"],
//! ]);
//!
//! assert_eq!(tree.find("2.1.1.1"), Some("FR"));
//! assert_eq!(tree.find("210.1.1.1"), Some("KR"));
//! assert_eq!(tree.find("4.4.4.4"), None);
//! ```
//!
//! # Architecture
//!
//! ```text
//! raw records ──► range_parser ──► IpRange ──► stable sort by start
//!                      │                              │
//!                 (skip + log)                        ▼
//!                                  median-of-slice build ──► RangeTree
//! ```
//!
//! The tree is immutable once built and can be shared across threads for
//! concurrent lookups. Malformed records are logged through the [`log`]
//! facade and skipped; malformed queries simply report "not found".

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
/// Error types for range parsing
pub mod error;
pub mod file_reader;
pub mod range_parser;
pub mod range_tree;

// Re-exports for Rust consumers

pub use crate::error::{RangeError, Result};
pub use crate::range_parser::{parse_record, IpRange};
pub use crate::range_tree::{RangeTree, RangeTreeBuilder, SkippedRecord, TreeStats};

// Version information
/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
