//! Error types for capillary-enclosure.
//!
//! Each subsystem owns its error type:
//!
//! - [`ConfigError`] — configuration file handling (this module)
//! - [`EnclosureError`] — parameter loading and validation
//! - [`ScadError`] — writing OpenSCAD output
//!
//! [`Error`] wraps all three for callers that drive the whole pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::enclosure::EnclosureError;
use crate::scad::ScadError;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Explicitly requested configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Any error raised while generating enclosure output.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Enclosure parameter error.
    #[error(transparent)]
    Enclosure(#[from] EnclosureError),

    /// Output error.
    #[error(transparent)]
    Scad(#[from] ScadError),

    /// Parameters could not be serialised.
    #[error("failed to serialise parameters")]
    Serialize(#[source] serde_json::Error),
}
