//! XML encoding of declarations.
//!
//! `to_bytes` renders the exact file handed to the tax authority: a fixed
//! UTF-8 prolog followed by the document indented with two spaces.
//! `from_bytes` reads a stored file back into a [`Declaration`].
//!
//! [`Declaration`]: crate::declaration::Declaration

pub mod error;
pub mod reader;
pub mod writer;

#[cfg(test)]
mod writer_props;

pub use error::XmlError;
pub use reader::from_bytes;
pub use writer::{PROLOG, to_bytes};
