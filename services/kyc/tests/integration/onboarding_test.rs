use chrono::NaiveDate;

use staynest_domain::{TenantField, TenantForm};
use staynest_kyc::domain::types::{NotificationLevel, Operation};
use staynest_kyc::error::KycError;
use staynest_kyc::onboarding::TenantOnboarding;
use staynest_kyc::session::{SessionState, VerificationStatus};

use crate::helpers::{AADHAAR, MockKycPort, RecordingNotifier, session};

#[tokio::test]
async fn should_fill_form_and_lock_number_after_verification() {
    let port = MockKycPort::new();
    let notifier = RecordingNotifier::shared();
    let mut onboarding = TenantOnboarding::new(session(&port, &notifier));
    onboarding.set_aadhaar_number(AADHAAR).unwrap();

    onboarding.request_otp().await.unwrap();
    let conflicts = onboarding.verify("123456").await.unwrap();

    assert!(conflicts.is_empty());
    let form = onboarding.form();
    assert_eq!(form.name, "Jane Doe");
    assert_eq!(form.dob, NaiveDate::from_ymd_opt(1990, 4, 15));
    assert_eq!(form.address, "MG Road, Bengaluru, Karnataka, India, 560001");
    assert!(form.is_aadhaar_locked());

    let result = onboarding.set_aadhaar_number("999999999999");
    assert!(matches!(result, Err(KycError::IdentityLocked)));
    assert_eq!(onboarding.form().aadhaar_number(), AADHAAR);
}

#[tokio::test]
async fn should_warn_and_keep_prefilled_name_on_conflict() {
    let port = MockKycPort::new();
    let notifier = RecordingNotifier::shared();
    let mut form = TenantForm::default();
    form.name = "J. Smith".to_owned();
    let mut onboarding = TenantOnboarding::with_form(form, session(&port, &notifier));
    onboarding.set_aadhaar_number(AADHAAR).unwrap();

    onboarding.request_otp().await.unwrap();
    let conflicts = onboarding.verify("123456").await.unwrap();

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].field, TenantField::Name);
    assert_eq!(onboarding.form().name, "J. Smith");

    let last = notifier.last().unwrap();
    assert_eq!(last.level, NotificationLevel::Warning);
    assert_eq!(last.operation, Operation::VerifyOtp);
    assert!(last.message.contains("Jane Doe"), "{}", last.message);
    assert!(last.message.contains("J. Smith"), "{}", last.message);
}

#[tokio::test]
async fn should_keep_form_when_required_field_missing() {
    let port = MockKycPort::new();
    let notifier = RecordingNotifier::shared();
    let mut form = TenantForm::default();
    form.phone = "9876543210".to_owned();
    let mut onboarding = TenantOnboarding::with_form(form, session(&port, &notifier));
    onboarding.set_aadhaar_number(AADHAAR).unwrap();
    onboarding.request_otp().await.unwrap();

    let result = onboarding.submit();

    assert!(matches!(result, Err(KycError::MissingField(TenantField::Name))));
    assert_eq!(onboarding.form().phone, "9876543210");
    assert_eq!(onboarding.form().aadhaar_number(), AADHAAR);
    assert_eq!(onboarding.session().txn_id().unwrap().as_str(), "TX1");

    let last = notifier.last().unwrap();
    assert_eq!(last.level, NotificationLevel::Error);
    assert_eq!(last.operation, Operation::SubmitTenant);
    assert_eq!(last.message, "name is required");
}

#[tokio::test]
async fn should_submit_verified_tenant_and_discard_session() {
    let port = MockKycPort::new();
    let notifier = RecordingNotifier::shared();
    let mut form = TenantForm::default();
    form.phone = " 9876543210 ".to_owned();
    form.email = Some("  ".to_owned());
    let mut onboarding = TenantOnboarding::with_form(form, session(&port, &notifier));
    onboarding.set_aadhaar_number(AADHAAR).unwrap();
    onboarding.request_otp().await.unwrap();
    onboarding.verify("123456").await.unwrap();

    let submission = onboarding.submit().unwrap();

    assert_eq!(submission.name, "Jane Doe");
    assert_eq!(submission.phone, "9876543210");
    assert_eq!(submission.email, None);
    assert_eq!(submission.aadhaar_number.as_deref(), Some(AADHAAR));
    assert!(submission.aadhaar_verified);

    assert_eq!(onboarding.session().state(), &SessionState::Idle);
    assert_eq!(onboarding.form(), &TenantForm::default());
    assert_eq!(notifier.last().unwrap().message, "Tenant details submitted");
}

#[tokio::test]
async fn should_submit_unverified_tenant_without_flag() {
    let port = MockKycPort::new();
    let notifier = RecordingNotifier::shared();
    let mut form = TenantForm::default();
    form.name = "Ravi Kumar".to_owned();
    form.phone = "9876543210".to_owned();
    let mut onboarding = TenantOnboarding::with_form(form, session(&port, &notifier));

    let submission = onboarding.submit().unwrap();

    assert!(!submission.aadhaar_verified);
    assert_eq!(submission.aadhaar_number, None);
    assert_eq!(port.generate_calls(), 0);
}

#[tokio::test]
async fn should_clear_everything_on_cancel() {
    let port = MockKycPort::new();
    let notifier = RecordingNotifier::shared();
    let mut onboarding = TenantOnboarding::new(session(&port, &notifier));
    onboarding.form_mut().phone = "9876543210".to_owned();
    onboarding.set_aadhaar_number(AADHAAR).unwrap();
    onboarding.request_otp().await.unwrap();

    onboarding.cancel();

    assert_eq!(onboarding.form(), &TenantForm::default());
    assert_eq!(onboarding.session().state(), &SessionState::Idle);
    assert_eq!(onboarding.session().cooldown_remaining(), 0);
    assert!(onboarding.session().can_request_otp());
}

#[tokio::test]
async fn should_not_call_backend_for_invalid_form_number() {
    let port = MockKycPort::new();
    let notifier = RecordingNotifier::shared();
    let mut onboarding = TenantOnboarding::new(session(&port, &notifier));
    onboarding.set_aadhaar_number("1234").unwrap();

    let result = onboarding.request_otp().await;

    assert!(matches!(result, Err(KycError::InvalidAadhaarNumber)));
    assert_eq!(port.generate_calls(), 0);
    assert_eq!(notifier.count(NotificationLevel::Error), 1);
}

#[tokio::test(start_paused = true)]
async fn should_abandon_pending_otp_when_number_changes() {
    let port = MockKycPort::new();
    let notifier = RecordingNotifier::shared();
    let mut onboarding = TenantOnboarding::new(session(&port, &notifier));
    onboarding.form_mut().name = "Jane Doe".to_owned();
    onboarding.form_mut().phone = "9876543210".to_owned();
    onboarding.set_aadhaar_number("111111111111").unwrap();
    onboarding.request_otp().await.unwrap();

    onboarding.set_aadhaar_number("222222222222").unwrap();

    assert_eq!(onboarding.session().state(), &SessionState::Idle);
    assert_eq!(onboarding.session().cooldown_remaining(), 30, "cooldown keeps running");
    let result = onboarding.verify("123456").await;
    assert!(matches!(result, Err(KycError::NoTransaction)));
    assert_eq!(port.submit_calls(), 0);

    let submission = onboarding.submit().unwrap();
    assert_eq!(submission.aadhaar_number.as_deref(), Some("222222222222"));
    assert!(!submission.aadhaar_verified);
}

#[tokio::test]
async fn should_keep_pending_otp_when_number_is_only_reformatted() {
    let port = MockKycPort::new();
    let notifier = RecordingNotifier::shared();
    let mut onboarding = TenantOnboarding::new(session(&port, &notifier));
    onboarding.set_aadhaar_number(AADHAAR).unwrap();
    onboarding.request_otp().await.unwrap();

    onboarding.set_aadhaar_number("1234 5678 9012").unwrap();

    assert_eq!(onboarding.session().status(), VerificationStatus::Pending);
    onboarding.verify("123456").await.unwrap();
    assert_eq!(onboarding.form().aadhaar_number(), AADHAAR);
}
