//! Option materialization error types.
//!
//! Domain-specific errors for contract registration, option resolution,
//! value coercion and raw source loading.

use std::path::PathBuf;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while registering, resolving or reading option contracts.
///
/// Registration errors (`InvalidContract`) are raised immediately. Resolution
/// errors (`MissingOption`, `TemplateDispatchUnavailable`) are collected for
/// every contract in one pass and reported together. Coercion errors are only
/// raised when the accessor holding the malformed value is invoked.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionsError {
    #[error("Invalid option contract [{contract}]: {reason}")]
    InvalidContract { contract: String, reason: String },

    #[error("Option '{key}' specified in contract [{contract}] is unavailable in provided configuration")]
    MissingOption { key: String, contract: String },

    #[error("Cannot convert '{value}' to {target}: {reason}")]
    TypeCoercion {
        value: String,
        target: String,
        reason: String,
    },

    #[error("Contract [{contract}] declares no accessor named '{accessor}'")]
    UnknownAccessor { contract: String, accessor: String },

    #[error("Accessor '{accessor}' returns {actual}, not {expected}")]
    TypeMismatch {
        accessor: String,
        expected: String,
        actual: String,
    },

    #[error("Cannot use template option contracts unless base-class dispatch is enabled, [{contract}] was a template")]
    TemplateDispatchUnavailable { contract: String },
}

/// Result type alias for option operations.
pub type OptionsResult<T> = Result<T, OptionsError>;

/// Errors raised by raw option source providers.
///
/// These are fatal configuration errors: a source that cannot be read or
/// parsed stops configuration before aggregation begins.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read option source {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported option source format: {path:?}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to parse option source {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Missing root configuration selector: {selector} in {path:?}")]
    MissingSelector { selector: String, path: PathBuf },

    #[error("Nested value for key '{key}' in {path:?} is not supported")]
    NestedValue { key: String, path: PathBuf },
}
