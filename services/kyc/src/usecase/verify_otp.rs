use staynest_domain::{OtpCode, TxnId};
use tracing::info;

use crate::domain::port::KycPort;
use crate::domain::types::Verification;
use crate::error::KycError;

pub struct VerifyOtpInput {
    pub txn_id: TxnId,
    pub otp: String,
}

pub struct VerifyOtpUseCase<K: KycPort> {
    pub kyc: K,
}

impl<K: KycPort> VerifyOtpUseCase<K> {
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<Verification, KycError> {
        let otp: OtpCode = input.otp.parse()?;
        let verification = self.kyc.submit_otp(&input.txn_id, &otp).await?;
        info!(txn_id = %input.txn_id, "otp verified");
        Ok(verification)
    }
}
