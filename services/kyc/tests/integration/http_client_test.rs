use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use staynest_core::ApiSession;
use staynest_domain::{AadhaarNumber, OtpCode, TxnId};
use staynest_kyc::domain::port::KycPort;
use staynest_kyc::domain::types::NotificationLevel;
use staynest_kyc::error::KycError;
use staynest_kyc::infra::http::HttpKycClient;
use staynest_kyc::session::OtpVerificationSession;
use staynest_testing::{FakeKycConfig, FakeKycServer};

use crate::helpers::{AADHAAR, RecordingNotifier};

fn client(server: &FakeKycServer) -> HttpKycClient {
    HttpKycClient::new(ApiSession::new(server.base_url()).unwrap())
}

fn aadhaar() -> AadhaarNumber {
    AADHAAR.parse().unwrap()
}

fn otp(code: &str) -> OtpCode {
    code.parse().unwrap()
}

// ── generate-otp ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_txn_id_and_send_camel_case_body() {
    let server = FakeKycServer::spawn().await;

    let issued = client(&server).generate_otp(&aadhaar()).await.unwrap();

    assert_eq!(issued.txn_id.as_str(), "TX1");
    assert_eq!(issued.message.as_deref(), Some("OTP sent successfully"));
    assert_eq!(
        server.last_generate_body(),
        Some(json!({ "aadhaarNumber": AADHAAR }))
    );
}

#[tokio::test]
async fn should_attach_bearer_token_when_session_has_one() {
    let server = FakeKycServer::spawn().await;
    let session = ApiSession::new(server.base_url())
        .unwrap()
        .with_token("secret-token")
        .unwrap();

    HttpKycClient::new(session)
        .generate_otp(&aadhaar())
        .await
        .unwrap();

    assert_eq!(
        server.last_authorization().as_deref(),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn should_send_no_authorization_for_anonymous_session() {
    let server = FakeKycServer::spawn().await;

    client(&server).generate_otp(&aadhaar()).await.unwrap();

    assert_eq!(server.last_authorization(), None);
}

#[tokio::test]
async fn should_surface_error_status_message() {
    let server = FakeKycServer::spawn_with(FakeKycConfig {
        generate_failure: Some((
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "success": false, "message": "UIDAI service unavailable" }),
        )),
        ..FakeKycConfig::default()
    })
    .await;

    let err = client(&server).generate_otp(&aadhaar()).await.unwrap_err();

    match err {
        KycError::Rejected {
            status, message, ..
        } => {
            assert_eq!(status, Some(503));
            assert_eq!(message, "UIDAI service unavailable");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn should_fall_back_when_error_body_has_no_message() {
    let server = FakeKycServer::spawn_with(FakeKycConfig {
        generate_failure: Some((StatusCode::INTERNAL_SERVER_ERROR, json!({}))),
        ..FakeKycConfig::default()
    })
    .await;

    let err = client(&server).generate_otp(&aadhaar()).await.unwrap_err();

    assert_eq!(err.kind(), "REJECTED");
    assert_eq!(err.to_string(), "Failed to send OTP");
}

#[tokio::test]
async fn should_reject_ok_response_with_success_false() {
    let server = FakeKycServer::spawn_with(FakeKycConfig {
        generate_failure: Some((
            StatusCode::OK,
            json!({ "success": false, "message": "Aadhaar not linked with mobile" }),
        )),
        ..FakeKycConfig::default()
    })
    .await;

    let err = client(&server).generate_otp(&aadhaar()).await.unwrap_err();

    match err {
        KycError::Rejected {
            status, message, ..
        } => {
            assert_eq!(status, None);
            assert_eq!(message, "Aadhaar not linked with mobile");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_success_without_txn_id() {
    let server = FakeKycServer::spawn_with(FakeKycConfig {
        generate_failure: Some((StatusCode::OK, json!({ "success": true }))),
        ..FakeKycConfig::default()
    })
    .await;

    let err = client(&server).generate_otp(&aadhaar()).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to send OTP");
}

#[tokio::test]
async fn should_map_unreachable_backend_to_internal() {
    let session = ApiSession::new("http://127.0.0.1:1").unwrap();

    let err = HttpKycClient::new(session)
        .generate_otp(&aadhaar())
        .await
        .unwrap_err();

    assert!(matches!(err, KycError::Internal(_)), "got {err:?}");
    assert_eq!(
        err.user_message(staynest_kyc::domain::types::Operation::GenerateOtp),
        "Failed to send OTP"
    );
}

// ── submit-otp ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_identity_with_composed_address() {
    let server = FakeKycServer::spawn().await;
    let http = client(&server);
    let issued = http.generate_otp(&aadhaar()).await.unwrap();

    let verification = http
        .submit_otp(&issued.txn_id, &otp("123456"))
        .await
        .unwrap();

    let identity = verification.identity;
    assert_eq!(identity.full_name, "Jane Doe");
    assert_eq!(identity.dob.unwrap().to_string(), "1990-04-15");
    assert_eq!(
        identity.address,
        "MG Road, Bengaluru, Karnataka, India, 560001"
    );
    assert_eq!(identity.aadhaar_number.as_deref(), Some("XXXXXXXX9012"));
    assert_eq!(verification.message.as_deref(), Some("Aadhaar verified"));
}

#[tokio::test]
async fn should_surface_invalid_otp_with_status() {
    let server = FakeKycServer::spawn().await;
    let http = client(&server);
    let issued = http.generate_otp(&aadhaar()).await.unwrap();

    let err = http
        .submit_otp(&issued.txn_id, &otp("000000"))
        .await
        .unwrap_err();

    match err {
        KycError::Rejected {
            status, message, ..
        } => {
            assert_eq!(status, Some(400));
            assert_eq!(message, "Invalid OTP");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn should_refuse_reused_txn_id() {
    let server = FakeKycServer::spawn().await;
    let http = client(&server);
    let issued = http.generate_otp(&aadhaar()).await.unwrap();
    http.submit_otp(&issued.txn_id, &otp("123456"))
        .await
        .unwrap();

    let err = http
        .submit_otp(&issued.txn_id, &otp("123456"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid or expired transaction");
    assert_eq!(server.submit_calls(), 2);
}

#[tokio::test]
async fn should_reject_ok_status_submit_with_success_false() {
    let server = FakeKycServer::spawn_with(FakeKycConfig {
        rejection_status: StatusCode::OK,
        ..FakeKycConfig::default()
    })
    .await;
    let txn: TxnId = "UNKNOWN".parse().unwrap();

    let err = client(&server)
        .submit_otp(&txn, &otp("123456"))
        .await
        .unwrap_err();

    match err {
        KycError::Rejected {
            status, message, ..
        } => {
            assert_eq!(status, None);
            assert_eq!(message, "Invalid or expired transaction");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

// ── full flow ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_verify_end_to_end_over_http() {
    let server = FakeKycServer::spawn().await;
    let notifier = RecordingNotifier::shared();
    let mut session = OtpVerificationSession::new(client(&server), Arc::clone(&notifier));

    session.request_otp(AADHAAR).await.unwrap();
    assert_eq!(session.txn_id().unwrap().as_str(), "TX1");

    let err = session.verify_code("000000").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid OTP");
    assert!(!session.is_verified());

    let identity = session.verify_code("123456").await.unwrap();
    assert_eq!(identity.full_name, "Jane Doe");
    assert!(session.is_verified());

    assert!(matches!(
        session.verify_code("123456").await,
        Err(KycError::AlreadyVerified)
    ));
    assert_eq!(server.generate_calls(), 1);
    assert_eq!(server.submit_calls(), 2);
    assert_eq!(notifier.count(NotificationLevel::Success), 2);
    assert_eq!(notifier.count(NotificationLevel::Error), 1);
}
