//! The JPK_V7M declaration document.
//!
//! A `Declaration` is the structured form of the file handed to the tax
//! authority: header, filer identity, the VAT-7 form fields and the
//! sales/purchase ledger. It is built once per generation request and never
//! mutated afterwards.
//!
//! # Modules
//!
//! - `constants` - Fixed schema and form metadata
//! - `types` - The document tree
//! - `builder` - Assembly from an aggregation

pub mod builder;
pub mod constants;
pub mod types;

pub use builder::DeclarationBuilder;
pub use types::{
    ControlTotals, Declaration, DeclarationForm, DeclarationFormCode, Filer, FilerIdentity,
    FormCode, FormFields, Header, Ledger, SubmissionPurpose,
};
