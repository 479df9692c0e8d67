use thiserror::Error;

/// Validation errors for canonical primitives.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a hex string cannot be decoded.
    #[error("{field} ('{value}') is not valid hex: {source}")]
    InvalidHex {
        /// Field name that failed decoding.
        field: &'static str,
        /// Offending value.
        value: String,
        /// Decoder error.
        source: hex::FromHexError,
    },
}
