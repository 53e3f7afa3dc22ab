#![allow(async_fn_in_trait)]

use std::sync::Arc;

use staynest_domain::{AadhaarNumber, OtpCode, TxnId};

use crate::domain::types::{Notification, OtpIssued, Verification};
use crate::error::KycError;

/// Port to the remote Aadhaar KYC endpoints.
pub trait KycPort: Send + Sync {
    /// Ask the backend to send an OTP to the phone linked with `aadhaar`.
    async fn generate_otp(&self, aadhaar: &AadhaarNumber) -> Result<OtpIssued, KycError>;

    /// Submit the OTP the user received for transaction `txn_id`.
    async fn submit_otp(&self, txn_id: &TxnId, otp: &OtpCode) -> Result<Verification, KycError>;
}

impl<T: KycPort + ?Sized> KycPort for &T {
    async fn generate_otp(&self, aadhaar: &AadhaarNumber) -> Result<OtpIssued, KycError> {
        (**self).generate_otp(aadhaar).await
    }

    async fn submit_otp(&self, txn_id: &TxnId, otp: &OtpCode) -> Result<Verification, KycError> {
        (**self).submit_otp(txn_id, otp).await
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}
