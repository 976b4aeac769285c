//! Common types used across the application.

pub mod id;
pub mod money;
pub mod nip;

pub use id::*;
pub use money::{format_amount, round_to_units};
pub use nip::{Nip, NipError};
