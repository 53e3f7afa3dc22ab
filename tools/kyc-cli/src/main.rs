//! Operator CLI for the Aadhaar OTP flow.
//!
//! # Usage
//!
//! ```bash
//! # Request an OTP and print the txn id
//! cargo run -p kyc-cli -- --base-url http://localhost:8080 generate-otp --aadhaar 123456789012
//!
//! # Verify it from a second invocation
//! cargo run -p kyc-cli -- submit-otp --txn-id TX1 --otp 123456
//!
//! # Interactive: type codes until one verifies, `resend` for a new OTP
//! cargo run -p kyc-cli -- verify --aadhaar 123456789012
//! ```
//!
//! `STAYNEST_API_URL`, `STAYNEST_API_TOKEN` and `KYC_OTP_COOLDOWN_SECS` are
//! read from the environment (and `.env`) when the matching flag is absent.

use anyhow::{Context as _, Result};
use clap::Parser;
use kyc_cli::args::{Cli, Command};
use kyc_cli::commands;
use staynest_kyc::infra::http::HttpKycClient;
use staynest_kyc::infra::notify::TracingNotifier;
use staynest_kyc::session::OtpVerificationSession;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    staynest_core::tracing::init_tracing();

    let cli = Cli::parse();
    let config = cli.config().context("failed to load configuration")?;
    let client = HttpKycClient::new(config.api_session()?);
    tracing::debug!(api = %config.api_base_url, "kyc-cli starting");

    let mut stdout = std::io::stdout();
    match cli.command {
        Command::GenerateOtp { aadhaar } => {
            let mut session =
                OtpVerificationSession::with_cooldown(client, TracingNotifier, config.cooldown_secs);
            commands::generate_otp(&mut session, &aadhaar, &mut stdout).await?;
        }
        Command::SubmitOtp { txn_id, otp } => {
            commands::submit_otp(&client, &txn_id, &otp, &mut stdout).await?;
        }
        Command::Verify { aadhaar } => {
            let mut session =
                OtpVerificationSession::with_cooldown(client, TracingNotifier, config.cooldown_secs);
            let stdin = BufReader::new(tokio::io::stdin());
            commands::verify(&mut session, &aadhaar, stdin, &mut stdout).await?;
        }
    }

    Ok(())
}
