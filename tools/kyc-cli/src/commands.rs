//! Subcommand bodies. Output goes to `out`; diagnostics go through tracing.

use std::io::Write;

use anyhow::{Context as _, Result, bail};
use staynest_domain::{TxnId, VerifiedIdentity};
use staynest_kyc::domain::port::{KycPort, Notifier};
use staynest_kyc::domain::types::Operation;
use staynest_kyc::error::KycError;
use staynest_kyc::session::OtpVerificationSession;
use staynest_kyc::usecase::verify_otp::{VerifyOtpInput, VerifyOtpUseCase};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const RESEND: &str = "resend";

pub fn render_identity(identity: &VerifiedIdentity) -> String {
    let dob = match (identity.dob, identity.dob_raw.as_deref()) {
        (Some(dob), _) => dob.to_string(),
        (None, Some(raw)) => raw.to_owned(),
        (None, None) => "-".to_owned(),
    };
    format!(
        "name:    {}\ndob:     {}\naddress: {}\naadhaar: {}",
        identity.full_name,
        dob,
        identity.address,
        identity.aadhaar_number.as_deref().unwrap_or("-"),
    )
}

pub async fn generate_otp<P, N, W>(
    session: &mut OtpVerificationSession<P, N>,
    aadhaar: &str,
    out: &mut W,
) -> Result<TxnId>
where
    P: KycPort,
    N: Notifier,
    W: Write,
{
    let txn_id = session.request_otp(aadhaar).await?;
    writeln!(out, "{txn_id}")?;
    Ok(txn_id)
}

/// One-shot verification of a txn id issued by an earlier `generate-otp`.
pub async fn submit_otp<P, W>(
    port: P,
    txn_id: &str,
    otp: &str,
    out: &mut W,
) -> Result<VerifiedIdentity>
where
    P: KycPort,
    W: Write,
{
    let txn_id: TxnId = txn_id.parse().context("invalid --txn-id")?;
    let verification = VerifyOtpUseCase { kyc: port }
        .execute(VerifyOtpInput {
            txn_id,
            otp: otp.to_owned(),
        })
        .await?;
    writeln!(out, "{}", render_identity(&verification.identity))?;
    Ok(verification.identity)
}

/// Interactive flow: request an OTP, then read lines from `input` until a
/// code verifies. A `resend` line re-requests, subject to the cooldown.
pub async fn verify<P, N, R, W>(
    session: &mut OtpVerificationSession<P, N>,
    aadhaar: &str,
    input: R,
    out: &mut W,
) -> Result<VerifiedIdentity>
where
    P: KycPort,
    N: Notifier,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let txn_id = session.request_otp(aadhaar).await?;
    writeln!(
        out,
        "OTP sent (txn {txn_id}). Enter the 6-digit code, or `{RESEND}` for a new one:"
    )?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case(RESEND) {
            match session.request_otp(aadhaar).await {
                Ok(txn_id) => writeln!(out, "OTP re-sent (txn {txn_id})")?,
                Err(KycError::CooldownActive { remaining_secs }) => {
                    writeln!(out, "wait {remaining_secs}s before requesting a new OTP")?
                }
                Err(e) => writeln!(out, "{}", e.user_message(Operation::GenerateOtp))?,
            }
            continue;
        }

        match session.verify_code(line).await {
            Ok(identity) => {
                writeln!(out, "{}", render_identity(&identity))?;
                return Ok(identity);
            }
            Err(e) => writeln!(out, "{}; try again", e.user_message(Operation::VerifyOtp))?,
        }
    }

    bail!("input closed before the OTP was verified")
}
