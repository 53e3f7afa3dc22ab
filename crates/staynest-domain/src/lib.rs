//! Domain types shared across all Staynest crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never depend on HTTP or runtime crates here.

pub mod id;
pub mod identity;
pub mod tenant;

pub use id::{AadhaarNumber, OtpCode, ParseError, TxnId};
pub use identity::{AadhaarAddress, VerifiedIdentity};
pub use tenant::{AadhaarLocked, FieldConflict, TenantField, TenantForm, TenantSubmission};
