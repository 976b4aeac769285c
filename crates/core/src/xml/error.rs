//! XML encoding errors.

use std::fmt::Display;

use thiserror::Error;

/// Errors raised while writing or reading declaration XML.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The writer rejected an event.
    #[error("failed to write declaration XML: {0}")]
    Write(String),

    /// The document is not well-formed or does not match the schema.
    #[error("failed to read declaration XML: {0}")]
    Read(String),

    /// A field holds a value that cannot be written, or parsed to an
    /// impossible one.
    #[error("invalid {field} in declaration XML: {message}")]
    InvalidValue {
        /// Tag of the offending element.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

pub(crate) fn write_error<E: Display>(e: E) -> XmlError {
    XmlError::Write(e.to_string())
}

pub(crate) fn read_error<E: Display>(e: E) -> XmlError {
    XmlError::Read(e.to_string())
}
