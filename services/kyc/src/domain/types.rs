use std::fmt;

use serde::Serialize;
use staynest_domain::{TxnId, VerifiedIdentity};

/// Default seconds before another OTP may be requested.
pub const DEFAULT_COOLDOWN_SECS: u64 = 30;

pub const GENERATE_OTP_PATH: &str = "/api/kyc/aadhaar/generate-otp";
pub const SUBMIT_OTP_PATH: &str = "/api/kyc/aadhaar/submit-otp";

/// User-facing operation an outcome or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GenerateOtp,
    VerifyOtp,
    SubmitTenant,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GenerateOtp => "generate_otp",
            Self::VerifyOtp => "verify_otp",
            Self::SubmitTenant => "submit_tenant",
        }
    }

    /// Shown when the backend gives no message of its own.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::GenerateOtp => "Failed to send OTP",
            Self::VerifyOtp => "OTP verification failed",
            Self::SubmitTenant => "Failed to submit tenant",
        }
    }

    pub(crate) fn success_message(self) -> &'static str {
        match self {
            Self::GenerateOtp => "OTP sent successfully",
            Self::VerifyOtp => "Aadhaar verified successfully",
            Self::SubmitTenant => "Tenant details submitted",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// Transient user-facing message (toast / banner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub operation: Operation,
    pub message: String,
}

impl Notification {
    pub fn success(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            operation,
            message: message.into(),
        }
    }

    pub fn warning(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            operation,
            message: message.into(),
        }
    }

    pub fn error(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            operation,
            message: message.into(),
        }
    }
}

/// Backend acknowledgement of an OTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpIssued {
    pub txn_id: TxnId,
    pub message: Option<String>,
}

/// Backend acknowledgement of a successful OTP verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub identity: VerifiedIdentity,
    pub message: Option<String>,
}
