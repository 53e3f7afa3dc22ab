use staynest_core::{ApiSession, ApiSessionError};

use crate::domain::types::DEFAULT_COOLDOWN_SECS;

/// Errors raised while loading [`KycConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error(transparent)]
    Session(#[from] ApiSessionError),
}

/// KYC client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct KycConfig {
    /// Base origin of the property-management API. Env var: `STAYNEST_API_URL`.
    pub api_base_url: String,
    /// Bearer token for authenticated endpoints. Env var: `STAYNEST_API_TOKEN`.
    pub api_token: Option<String>,
    /// Seconds before a new OTP may be requested (default 30, 0 disables).
    /// Env var: `KYC_OTP_COOLDOWN_SECS`.
    pub cooldown_secs: u64,
}

impl KycConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (env, `.env` map, test fixture).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = lookup("STAYNEST_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("STAYNEST_API_URL"))?;
        let api_token = lookup("STAYNEST_API_TOKEN").filter(|v| !v.trim().is_empty());
        let cooldown_secs = match lookup("KYC_OTP_COOLDOWN_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "KYC_OTP_COOLDOWN_SECS",
                value: raw,
            })?,
            None => DEFAULT_COOLDOWN_SECS,
        };
        Ok(Self {
            api_base_url,
            api_token,
            cooldown_secs,
        })
    }

    /// Session context passed to API clients.
    pub fn api_session(&self) -> Result<ApiSession, ConfigError> {
        let session = ApiSession::new(&self.api_base_url)?;
        Ok(match &self.api_token {
            Some(token) => session.with_token(token)?,
            None => session,
        })
    }
}
