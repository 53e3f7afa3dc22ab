use staynest_domain::{AadhaarLocked, ParseError, TenantField};

use crate::domain::types::Operation;

/// KYC flow error variants.
#[derive(Debug, thiserror::Error)]
pub enum KycError {
    #[error("aadhaar number must be exactly 12 digits")]
    InvalidAadhaarNumber,
    #[error("otp must be exactly 6 digits")]
    InvalidOtp,
    #[error("please wait {remaining_secs}s before requesting a new otp")]
    CooldownActive { remaining_secs: u64 },
    #[error("no otp has been requested")]
    NoTransaction,
    #[error("aadhaar already verified")]
    AlreadyVerified,
    #[error("aadhaar number is locked after verification")]
    IdentityLocked,
    #[error("{} is required", .0.label())]
    MissingField(TenantField),
    /// The backend refused the request. `message` is the backend's own text when it sent one.
    #[error("{message}")]
    Rejected {
        operation: Operation,
        status: Option<u16>,
        message: String,
    },
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl KycError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAadhaarNumber => "INVALID_AADHAAR_NUMBER",
            Self::InvalidOtp => "INVALID_OTP",
            Self::CooldownActive { .. } => "COOLDOWN_ACTIVE",
            Self::NoTransaction => "NO_TRANSACTION",
            Self::AlreadyVerified => "ALREADY_VERIFIED",
            Self::IdentityLocked => "IDENTITY_LOCKED",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::Rejected { .. } => "REJECTED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Caught locally before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAadhaarNumber | Self::InvalidOtp | Self::MissingField(_)
        )
    }

    /// Refused because of session state that the UI already reflects by
    /// disabling the control. These are returned but never notified.
    pub fn is_state_guard(&self) -> bool {
        matches!(
            self,
            Self::CooldownActive { .. }
                | Self::NoTransaction
                | Self::AlreadyVerified
                | Self::IdentityLocked
        )
    }

    /// Text shown to the user for a failed `operation`.
    ///
    /// Internal failures never leak their cause; they fall back to the operation's generic text.
    pub fn user_message(&self, operation: Operation) -> String {
        match self {
            Self::Internal(_) => operation.fallback_message().to_owned(),
            other => other.to_string(),
        }
    }
}

impl From<ParseError> for KycError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidAadhaarNumber => Self::InvalidAadhaarNumber,
            ParseError::InvalidOtp => Self::InvalidOtp,
            ParseError::EmptyTxnId => Self::NoTransaction,
        }
    }
}

impl From<AadhaarLocked> for KycError {
    fn from(_: AadhaarLocked) -> Self {
        Self::IdentityLocked
    }
}
