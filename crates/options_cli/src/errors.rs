use std::io;
use std::path::PathBuf;

use options_core::{OptionsError, SourceError};
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the optionsctl CLI application.
#[derive(Error, Debug)]
pub enum Error {
    /// The contract file could not be read.
    #[error("Failed to read contract file {path:?}")]
    LoadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The contract file is not valid TOML or does not match the expected layout.
    #[error("Failed to parse contract file {path:?}: {reason}")]
    ParseContracts { path: PathBuf, reason: String },

    /// A declared default does not convert to its accessor's type.
    #[error("Invalid default for '{contract}.{accessor}': {source}")]
    InvalidDefault {
        contract: String,
        accessor: String,
        #[source]
        source: OptionsError,
    },

    /// A contract was rejected at registration.
    #[error(transparent)]
    Contract(#[from] OptionsError),

    /// An option source could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Invalid or incompatible command-line arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Writing command output failed.
    #[error("Failed to write output")]
    Output(#[from] io::Error),
}
