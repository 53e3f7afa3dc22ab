use staynest_domain::AadhaarNumber;
use tracing::info;

use crate::domain::port::KycPort;
use crate::domain::types::OtpIssued;
use crate::error::KycError;

pub struct RequestOtpInput {
    pub aadhaar: AadhaarNumber,
}

pub struct OtpRequested {
    pub aadhaar: AadhaarNumber,
    pub issued: OtpIssued,
}

pub struct RequestOtpUseCase<K: KycPort> {
    pub kyc: K,
}

impl<K: KycPort> RequestOtpUseCase<K> {
    pub async fn execute(&self, input: RequestOtpInput) -> Result<OtpRequested, KycError> {
        let aadhaar = input.aadhaar;

        // One generate-otp call, no retry
        let issued = self.kyc.generate_otp(&aadhaar).await?;

        info!(
            aadhaar = %aadhaar.masked(),
            txn_id = %issued.txn_id,
            "otp issued"
        );
        Ok(OtpRequested { aadhaar, issued })
    }
}
