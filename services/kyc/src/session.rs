//! Aadhaar OTP verification session: `Idle -> OtpSent -> Verified`.
//!
//! All transitions go through `&mut self`, so a session never has more than
//! one OTP call in flight.

use staynest_domain::{AadhaarNumber, OtpCode, TxnId, VerifiedIdentity};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cooldown::Cooldown;
use crate::domain::port::{KycPort, Notifier};
use crate::domain::types::{DEFAULT_COOLDOWN_SECS, Notification, Operation};
use crate::error::KycError;
use crate::usecase::request_otp::{RequestOtpInput, RequestOtpUseCase};
use crate::usecase::verify_otp::{VerifyOtpInput, VerifyOtpUseCase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    OtpSent { txn_id: TxnId },
    Verified { identity: VerifiedIdentity },
}

/// Coarse status shown next to the identity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Unverified,
    Pending,
    Verified,
}

impl SessionState {
    pub fn status(&self) -> VerificationStatus {
        match self {
            Self::Idle => VerificationStatus::Unverified,
            Self::OtpSent { .. } => VerificationStatus::Pending,
            Self::Verified { .. } => VerificationStatus::Verified,
        }
    }
}

pub struct OtpVerificationSession<P: KycPort, N: Notifier> {
    id: Uuid,
    port: P,
    notifier: N,
    cooldown_secs: u64,
    aadhaar: Option<AadhaarNumber>,
    state: SessionState,
    code: String,
    cooldown: Cooldown,
}

impl<P: KycPort, N: Notifier> OtpVerificationSession<P, N> {
    pub fn new(port: P, notifier: N) -> Self {
        Self::with_cooldown(port, notifier, DEFAULT_COOLDOWN_SECS)
    }

    /// `cooldown_secs = 0` disables the re-request wait.
    pub fn with_cooldown(port: P, notifier: N, cooldown_secs: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            port,
            notifier,
            cooldown_secs,
            aadhaar: None,
            state: SessionState::Idle,
            code: String::new(),
            cooldown: Cooldown::idle(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> VerificationStatus {
        self.state.status()
    }

    pub fn is_verified(&self) -> bool {
        self.status() == VerificationStatus::Verified
    }

    pub fn txn_id(&self) -> Option<&TxnId> {
        match &self.state {
            SessionState::OtpSent { txn_id } => Some(txn_id),
            _ => None,
        }
    }

    pub fn identity(&self) -> Option<&VerifiedIdentity> {
        match &self.state {
            SessionState::Verified { identity } => Some(identity),
            _ => None,
        }
    }

    /// Identity number the current OTP (or verification) belongs to.
    pub fn aadhaar(&self) -> Option<&AadhaarNumber> {
        self.aadhaar.as_ref()
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    pub fn cooldown_remaining(&self) -> u64 {
        self.cooldown.remaining()
    }

    /// Whether the "send OTP" control should be enabled.
    pub fn can_request_otp(&self) -> bool {
        !self.is_verified() && !self.cooldown.is_active()
    }

    /// Whether the "verify" control should be enabled.
    pub fn can_verify(&self) -> bool {
        self.txn_id().is_some() && self.code.parse::<OtpCode>().is_ok()
    }

    /// Code as currently typed.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Request an OTP for `identity_number`.
    ///
    /// Checked in order: identity lock, number format, cooldown. A malformed
    /// number is reported even while the cooldown runs; a well-formed one is
    /// a no-op returning [`KycError::CooldownActive`] until it ends.
    /// On failure the previous state (and any earlier token) is kept.
    pub async fn request_otp(&mut self, identity_number: &str) -> Result<TxnId, KycError> {
        let op = Operation::GenerateOtp;
        if self.is_verified() {
            return Err(self.guard(op, KycError::IdentityLocked));
        }
        let aadhaar: AadhaarNumber = match identity_number.parse() {
            Ok(aadhaar) => aadhaar,
            Err(e) => return Err(self.fail(op, e.into())),
        };
        if self.cooldown.is_active() {
            let remaining_secs = self.cooldown.remaining();
            return Err(self.guard(op, KycError::CooldownActive { remaining_secs }));
        }

        let result = RequestOtpUseCase { kyc: &self.port }
            .execute(RequestOtpInput { aadhaar })
            .await;

        match result {
            Ok(requested) => {
                let txn_id = requested.issued.txn_id.clone();
                self.aadhaar = Some(requested.aadhaar);
                self.state = SessionState::OtpSent {
                    txn_id: txn_id.clone(),
                };
                self.code.clear();
                self.cooldown = Cooldown::start(self.cooldown_secs);
                let message = requested
                    .issued
                    .message
                    .unwrap_or_else(|| op.success_message().to_owned());
                self.notify(Notification::success(op, message));
                Ok(txn_id)
            }
            Err(e) => Err(self.fail(op, e)),
        }
    }

    /// Verify the code set with [`Self::set_code`] against the stored token.
    ///
    /// On success the token is consumed, the code input cleared and the
    /// cooldown stopped. On rejection the typed code is kept for retry.
    pub async fn verify(&mut self) -> Result<VerifiedIdentity, KycError> {
        let op = Operation::VerifyOtp;
        let txn_id = match &self.state {
            SessionState::OtpSent { txn_id } => txn_id.clone(),
            SessionState::Idle => return Err(self.guard(op, KycError::NoTransaction)),
            SessionState::Verified { .. } => {
                return Err(self.guard(op, KycError::AlreadyVerified));
            }
        };

        let result = VerifyOtpUseCase { kyc: &self.port }
            .execute(VerifyOtpInput {
                txn_id,
                otp: self.code.clone(),
            })
            .await;

        match result {
            Ok(verification) => {
                let identity = verification.identity;
                self.state = SessionState::Verified {
                    identity: identity.clone(),
                };
                self.code.clear();
                self.cooldown.stop();
                let message = verification
                    .message
                    .unwrap_or_else(|| op.success_message().to_owned());
                self.notify(Notification::success(op, message));
                Ok(identity)
            }
            Err(e) => Err(self.fail(op, e)),
        }
    }

    /// [`Self::set_code`] followed by [`Self::verify`].
    pub async fn verify_code(&mut self, code: &str) -> Result<VerifiedIdentity, KycError> {
        self.set_code(code);
        self.verify().await
    }

    /// Drop a pending token and the typed code. The cooldown keeps running,
    /// so switching numbers does not bypass it. No-op unless an OTP is pending.
    pub fn abandon_otp(&mut self) {
        if let SessionState::OtpSent { txn_id } = &self.state {
            debug!(session = %self.id, %txn_id, "pending otp abandoned");
            self.state = SessionState::Idle;
            self.aadhaar = None;
            self.code.clear();
        }
    }

    /// Drop the token, identity and typed code; cancel the cooldown.
    pub fn reset(&mut self) {
        debug!(session = %self.id, "otp session reset");
        self.state = SessionState::Idle;
        self.aadhaar = None;
        self.code.clear();
        self.cooldown.stop();
    }

    fn guard(&self, operation: Operation, err: KycError) -> KycError {
        debug!(
            session = %self.id,
            %operation,
            kind = err.kind(),
            "otp action refused by session state"
        );
        err
    }

    fn fail(&self, operation: Operation, err: KycError) -> KycError {
        match &err {
            KycError::Internal(cause) => {
                tracing::error!(session = %self.id, %operation, error = %cause, "kyc call failed");
            }
            other => {
                warn!(session = %self.id, %operation, kind = other.kind(), "kyc operation failed");
            }
        }
        self.notify(Notification::error(operation, err.user_message(operation)));
        err
    }
}
