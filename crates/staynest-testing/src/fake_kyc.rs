//! In-process fake of `/api/kyc/aadhaar/*`.
//!
//! Binds an ephemeral localhost port, records what clients send, and answers
//! with the canned identity from [`FakeKycConfig`]. A txn id is consumed by
//! its first successful verification.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub const ACCEPTED_OTP: &str = "123456";
pub const DEFAULT_TXN_ID: &str = "TX1";

/// Canned identity payload returned for the accepted OTP.
pub fn jane_doe() -> Value {
    json!({
        "full_name": "Jane Doe",
        "dob": "1990-04-15",
        "zip": "560001",
        "aadhaar_number": "XXXXXXXX9012",
        "address": {
            "house": "12",
            "street": "MG Road",
            "landmark": "Near Metro",
            "dist": "Bengaluru",
            "po": "Shivajinagar",
            "state": "Karnataka",
            "country": "India"
        }
    })
}

#[derive(Debug, Clone)]
pub struct FakeKycConfig {
    /// Txn id handed out on every generate call; `None` mints a fresh UUID each time.
    pub txn_id: Option<String>,
    pub accepted_otp: String,
    /// `data` object of a successful submit response.
    pub data: Value,
    /// When set, every generate call answers with this status and body.
    pub generate_failure: Option<(StatusCode, Value)>,
    /// Status used for rejected submits. `200 OK` answers `{ "success": false }`.
    pub rejection_status: StatusCode,
}

impl Default for FakeKycConfig {
    fn default() -> Self {
        Self {
            txn_id: Some(DEFAULT_TXN_ID.to_owned()),
            accepted_otp: ACCEPTED_OTP.to_owned(),
            data: jane_doe(),
            generate_failure: None,
            rejection_status: StatusCode::BAD_REQUEST,
        }
    }
}

struct FakeState {
    config: FakeKycConfig,
    issued: Mutex<HashSet<String>>,
    generate_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    last_authorization: Mutex<Option<String>>,
    last_generate_body: Mutex<Option<Value>>,
}

impl FakeState {
    fn record_auth(&self, headers: &HeaderMap) {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        *self.last_authorization.lock().unwrap() = auth;
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateOtpBody {
    aadhaar_number: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitOtpBody {
    txn_id: String,
    otp: String,
}

fn rejection(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": false, "message": message })))
}

async fn generate_otp(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(raw): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.generate_calls.fetch_add(1, Ordering::SeqCst);
    state.record_auth(&headers);
    *state.last_generate_body.lock().unwrap() = Some(raw.clone());

    if let Some((status, body)) = &state.config.generate_failure {
        return (*status, Json(body.clone()));
    }

    let Ok(body) = serde_json::from_value::<GenerateOtpBody>(raw) else {
        return rejection(StatusCode::UNPROCESSABLE_ENTITY, "aadhaarNumber is required");
    };
    let valid = body.aadhaar_number.len() == 12
        && body.aadhaar_number.bytes().all(|b| b.is_ascii_digit());
    if !valid {
        return rejection(StatusCode::UNPROCESSABLE_ENTITY, "Invalid Aadhaar number");
    }

    let txn_id = state
        .config
        .txn_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    state.issued.lock().unwrap().insert(txn_id.clone());

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "txnId": txn_id,
            "message": "OTP sent successfully"
        })),
    )
}

async fn submit_otp(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<SubmitOtpBody>,
) -> (StatusCode, Json<Value>) {
    state.submit_calls.fetch_add(1, Ordering::SeqCst);
    state.record_auth(&headers);

    let status = state.config.rejection_status;
    if !state.issued.lock().unwrap().contains(&body.txn_id) {
        return rejection(status, "Invalid or expired transaction");
    }
    if body.otp != state.config.accepted_otp {
        return rejection(status, "Invalid OTP");
    }

    state.issued.lock().unwrap().remove(&body.txn_id);
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Aadhaar verified",
            "data": state.config.data.clone()
        })),
    )
}

/// Running fake backend. Shuts down on drop.
pub struct FakeKycServer {
    base_url: String,
    state: Arc<FakeState>,
    task: JoinHandle<()>,
}

impl FakeKycServer {
    pub async fn spawn() -> Self {
        Self::spawn_with(FakeKycConfig::default()).await
    }

    pub async fn spawn_with(config: FakeKycConfig) -> Self {
        let state = Arc::new(FakeState {
            config,
            issued: Mutex::new(HashSet::new()),
            generate_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            last_authorization: Mutex::new(None),
            last_generate_body: Mutex::new(None),
        });

        let router = Router::new()
            .route("/api/kyc/aadhaar/generate-otp", post(generate_otp))
            .route("/api/kyc/aadhaar/submit-otp", post(submit_otp))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake kyc backend");
        let addr = listener.local_addr().expect("fake kyc backend has no address");
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("fake kyc backend error");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            task,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn generate_calls(&self) -> usize {
        self.state.generate_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.state.submit_calls.load(Ordering::SeqCst)
    }

    /// `Authorization` header of the most recent request, if any.
    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }

    /// Raw JSON body of the most recent generate-otp request.
    pub fn last_generate_body(&self) -> Option<Value> {
        self.state.last_generate_body.lock().unwrap().clone()
    }
}

impl Drop for FakeKycServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
