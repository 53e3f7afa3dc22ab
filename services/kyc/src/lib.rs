pub mod config;
pub mod cooldown;
pub mod domain;
pub mod error;
pub mod infra;
pub mod onboarding;
pub mod session;
pub mod usecase;
