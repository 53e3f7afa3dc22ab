//! Test utilities for Staynest crates.
//!
//! Provides an in-process fake of the KYC backend endpoints.
//! Import from dev-dependencies only, never in production code.

pub mod fake_kyc;

pub use fake_kyc::{FakeKycConfig, FakeKycServer};
