/// Error types for the geotree library
use std::fmt;

use crate::address::format_address;

/// Result type alias for range parsing and ingestion
pub type Result<T> = std::result::Result<T, RangeError>;

/// Main error type for range records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// Malformed address, CIDR prefix, or record layout
    Format(String),

    /// A range whose start lies above its end
    StructuralInvalid {
        /// Parsed start address
        start: u32,
        /// Parsed end address
        end: u32,
    },
}

impl RangeError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        RangeError::Format(msg.into())
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::Format(msg) => write!(f, "Format error: {}", msg),
            RangeError::StructuralInvalid { start, end } => write!(
                f,
                "Invalid range: start {} is above end {}",
                format_address(*start),
                format_address(*end)
            ),
        }
    }
}

impl std::error::Error for RangeError {}
