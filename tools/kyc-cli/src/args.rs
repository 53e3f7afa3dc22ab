//! Command-line arguments. Flags win over environment variables.

use clap::{Parser, Subcommand};
use staynest_kyc::config::{ConfigError, KycConfig};

#[derive(Debug, Parser)]
#[command(name = "kyc-cli", about = "Drive the Aadhaar OTP verification flow against a live API")]
pub struct Cli {
    /// Base URL of the property-management API (falls back to STAYNEST_API_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token (falls back to STAYNEST_API_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Seconds before a new OTP may be requested (falls back to KYC_OTP_COOLDOWN_SECS)
    #[arg(long, global = true)]
    pub cooldown_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Request an OTP and print the transaction id
    GenerateOtp {
        #[arg(long)]
        aadhaar: String,
    },
    /// Submit an OTP for an earlier transaction and print the verified identity
    SubmitOtp {
        #[arg(long)]
        txn_id: String,
        #[arg(long)]
        otp: String,
    },
    /// Request an OTP, then read codes from stdin until verified (`resend` re-requests)
    Verify {
        #[arg(long)]
        aadhaar: String,
    },
}

impl Cli {
    pub fn config(&self) -> Result<KycConfig, ConfigError> {
        self.config_with(|key| std::env::var(key).ok())
    }

    /// Resolve configuration, preferring flags over `env`.
    pub fn config_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<KycConfig, ConfigError> {
        KycConfig::from_lookup(|key| {
            let flag = match key {
                "STAYNEST_API_URL" => self.base_url.clone(),
                "STAYNEST_API_TOKEN" => self.token.clone(),
                "KYC_OTP_COOLDOWN_SECS" => self.cooldown_secs.map(|s| s.to_string()),
                _ => None,
            };
            flag.or_else(|| env(key))
        })
    }
}
