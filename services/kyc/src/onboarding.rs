//! Tenant-creation form with the embedded Aadhaar OTP session.

use staynest_domain::{AadhaarNumber, FieldConflict, TenantForm, TenantSubmission, TxnId};
use tracing::info;

use crate::domain::port::{KycPort, Notifier};
use crate::domain::types::{Notification, Operation};
use crate::error::KycError;
use crate::session::OtpVerificationSession;

pub struct TenantOnboarding<P: KycPort, N: Notifier> {
    form: TenantForm,
    session: OtpVerificationSession<P, N>,
}

impl<P: KycPort, N: Notifier> TenantOnboarding<P, N> {
    pub fn new(session: OtpVerificationSession<P, N>) -> Self {
        Self::with_form(TenantForm::default(), session)
    }

    pub fn with_form(form: TenantForm, session: OtpVerificationSession<P, N>) -> Self {
        Self { form, session }
    }

    pub fn form(&self) -> &TenantForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TenantForm {
        &mut self.form
    }

    pub fn session(&self) -> &OtpVerificationSession<P, N> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut OtpVerificationSession<P, N> {
        &mut self.session
    }

    /// Update the form's identity number.
    ///
    /// Changing it away from the number a pending OTP was sent for abandons
    /// that OTP, so a code can only ever verify the number it was issued for.
    pub fn set_aadhaar_number(&mut self, value: impl Into<String>) -> Result<(), KycError> {
        self.form.set_aadhaar_number(value)?;
        let unchanged = self.session.aadhaar().is_some_and(|pending| {
            self.form
                .aadhaar_number()
                .parse::<AadhaarNumber>()
                .is_ok_and(|typed| &typed == pending)
        });
        if !unchanged {
            self.session.abandon_otp();
        }
        Ok(())
    }

    /// Request an OTP for the identity number currently in the form.
    pub async fn request_otp(&mut self) -> Result<TxnId, KycError> {
        let raw = self.form.aadhaar_number().to_owned();
        self.session.request_otp(&raw).await
    }

    /// Verify `code`, then merge the verified identity into the form.
    ///
    /// Returns the pre-filled fields that disagreed with the verified data;
    /// each one is also surfaced as a warning.
    pub async fn verify(&mut self, code: &str) -> Result<Vec<FieldConflict>, KycError> {
        let identity = self.session.verify_code(code).await?;
        let verified = self
            .session
            .aadhaar()
            .cloned()
            .ok_or(KycError::NoTransaction)?;
        let conflicts = self.form.apply_identity(&verified, &identity);
        for conflict in &conflicts {
            self.session.notify(Notification::warning(
                Operation::VerifyOtp,
                format!(
                    "{} on Aadhaar ({}) differs from the entered value ({}); keeping entered value",
                    conflict.field.label(),
                    conflict.verified,
                    conflict.current
                ),
            ));
        }
        Ok(conflicts)
    }

    /// Run the required-field check and hand off a snapshot.
    ///
    /// On success the OTP session is discarded and the form cleared. On
    /// failure everything is kept so the user can correct and resubmit.
    pub fn submit(&mut self) -> Result<TenantSubmission, KycError> {
        let op = Operation::SubmitTenant;
        if let Some(field) = self.form.missing_required() {
            let err = KycError::MissingField(field);
            self.session
                .notify(Notification::error(op, err.user_message(op)));
            return Err(err);
        }

        let submission = self.form.to_submission();
        info!(
            session = %self.session.id(),
            aadhaar_verified = submission.aadhaar_verified,
            "tenant form submitted"
        );
        self.session
            .notify(Notification::success(op, op.success_message()));
        self.discard();
        Ok(submission)
    }

    /// Abandon the form and its OTP session.
    pub fn cancel(&mut self) {
        info!(session = %self.session.id(), "tenant form cancelled");
        self.discard();
    }

    fn discard(&mut self) {
        self.session.reset();
        self.form = TenantForm::default();
    }
}
