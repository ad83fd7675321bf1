//! Error types for enclosure parameter handling.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for enclosure operations.
pub type EnclosureResult<T> = Result<T, EnclosureError>;

/// Errors that can occur while loading parameters or building an enclosure.
#[derive(Debug, Error)]
pub enum EnclosureError {
    /// Failed to read the parameter file.
    #[error("Failed to read parameter file: {path}")]
    ParamsRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to parse the parameter file.
    #[error("Failed to parse parameter file: {path}")]
    ParamsParse {
        /// Path to the file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Parameter file not found.
    #[error("Parameter file not found: {path}")]
    ParamsNotFound {
        /// Path where the file was expected.
        path: PathBuf,
    },

    /// Invalid parameter value.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Description of what's wrong.
        message: String,
    },
}

impl EnclosureError {
    /// Creates a parameter read error.
    pub fn params_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ParamsRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a parameter parse error.
    pub fn params_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ParamsParse {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}
