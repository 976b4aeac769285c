//! Core business logic for Vatdesk.
//!
//! This crate contains pure business logic with ZERO database dependencies.
//! Periods, invoice validation, VAT aggregation, the JPK_V7M document, its
//! XML encoding and the declaration lifecycle all live here. Persistence is
//! reached only through the `InvoiceLedger` and `DeclarationStore` ports.
//!
//! # Modules
//!
//! - `period` - Declaration periods and the injected clock
//! - `validation` - Field-scoped validation results
//! - `invoice` - Invoice facts, input validation, ledger port
//! - `vat` - Aggregation and the settlement rule
//! - `declaration` - The declaration document and its builder
//! - `xml` - Deterministic XML writer and reader
//! - `lifecycle` - Draft/confirmed state machine and store port
//! - `filing` - The service tying it all together

pub mod declaration;
pub mod filing;
pub mod invoice;
pub mod lifecycle;
pub mod period;
pub mod validation;
pub mod vat;
pub mod xml;
