//! Error types for conversion operations

use thiserror::Error;

/// Errors that can occur during HTML to Org conversion
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Input is not a string or an element/document/fragment node
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A plugin could not be applied to the converter
    #[error("Plugin error in '{name}': {message}")]
    Plugin { name: String, message: String },
    /// The markup tree nests deeper than the configured limit
    #[error("Nesting depth {depth} exceeds the limit of {limit}")]
    ResourceExhausted { depth: usize, limit: usize },
    /// HTML parsing failed
    #[error("Parse error: {0}")]
    Parse(String),
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConversionError {
    /// Get numeric error code for host integrations
    pub fn code(&self) -> u32 {
        match self {
            ConversionError::Parse(_) => 1,
            ConversionError::ResourceExhausted { .. } => 4,
            ConversionError::InvalidInput(_) => 5,
            ConversionError::Plugin { .. } => 6,
            ConversionError::Internal(_) => 99,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConversionError>;
