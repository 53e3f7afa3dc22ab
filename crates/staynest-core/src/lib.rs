//! Shared plumbing for Staynest crates: API session context and tracing setup.

pub mod api;
pub mod tracing;

pub use api::{ApiSession, ApiSessionError};
