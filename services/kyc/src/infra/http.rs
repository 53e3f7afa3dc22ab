use anyhow::Context as _;
use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use staynest_core::ApiSession;
use staynest_domain::identity::parse_dob;
use staynest_domain::{AadhaarAddress, AadhaarNumber, OtpCode, TxnId, VerifiedIdentity};

use crate::domain::port::KycPort;
use crate::domain::types::{
    GENERATE_OTP_PATH, Operation, OtpIssued, SUBMIT_OTP_PATH, Verification,
};
use crate::error::KycError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateOtpRequest<'a> {
    aadhaar_number: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateOtpResponse {
    #[serde(default)]
    success: bool,
    txn_id: Option<String>,
    message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitOtpRequest<'a> {
    txn_id: &'a str,
    otp: &'a str,
}

#[derive(Deserialize)]
struct SubmitOtpResponse {
    #[serde(default)]
    success: bool,
    data: Option<IdentityData>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct IdentityData {
    #[serde(default)]
    full_name: String,
    dob: Option<String>,
    #[serde(default)]
    address: AadhaarAddress,
    zip: Option<String>,
    aadhaar_number: Option<String>,
}

impl From<IdentityData> for VerifiedIdentity {
    fn from(data: IdentityData) -> Self {
        let dob_raw = data.dob.filter(|d| !d.trim().is_empty());
        VerifiedIdentity {
            full_name: data.full_name.trim().to_owned(),
            dob: dob_raw.as_deref().and_then(parse_dob),
            dob_raw,
            address: data.address.compose(data.zip.as_deref()),
            aadhaar_number: data.aadhaar_number,
        }
    }
}

/// Body shape of non-2xx responses; only `message` is used.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn rejected(operation: Operation, status: Option<u16>, message: Option<String>) -> KycError {
    KycError::Rejected {
        operation,
        status,
        message: message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| operation.fallback_message().to_owned()),
    }
}

/// `KycPort` over the property-management REST API.
///
/// No timeout, retry or cancellation: a hung request stays pending until the caller drops it.
#[derive(Debug, Clone)]
pub struct HttpKycClient {
    http: Client,
    session: ApiSession,
}

impl HttpKycClient {
    pub fn new(session: ApiSession) -> Self {
        Self {
            http: Client::new(),
            session,
        }
    }

    pub fn session(&self) -> &ApiSession {
        &self.session
    }

    async fn post<B, R>(&self, operation: Operation, path: &str, body: &B) -> Result<R, KycError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self
            .session
            .url(path)
            .with_context(|| format!("{operation} endpoint"))?;
        let mut request = self.http.post(url).json(body);
        if let Some(auth) = self.session.authorization() {
            request = request.header(header::AUTHORIZATION, auth.clone());
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("{operation} request to {path}"))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("{operation} response body"))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.message);
            return Err(rejected(operation, Some(status.as_u16()), message));
        }

        serde_json::from_str(&text)
            .with_context(|| format!("{operation} response is not valid json"))
            .map_err(KycError::from)
    }
}

impl KycPort for HttpKycClient {
    async fn generate_otp(&self, aadhaar: &AadhaarNumber) -> Result<OtpIssued, KycError> {
        let op = Operation::GenerateOtp;
        let body = GenerateOtpRequest {
            aadhaar_number: aadhaar.as_str(),
        };
        let resp: GenerateOtpResponse = self.post(op, GENERATE_OTP_PATH, &body).await?;

        let txn_id = resp
            .txn_id
            .as_deref()
            .and_then(|t| t.parse::<TxnId>().ok());
        match (resp.success, txn_id) {
            (true, Some(txn_id)) => Ok(OtpIssued {
                txn_id,
                message: resp.message,
            }),
            _ => Err(rejected(op, None, resp.message)),
        }
    }

    async fn submit_otp(&self, txn_id: &TxnId, otp: &OtpCode) -> Result<Verification, KycError> {
        let op = Operation::VerifyOtp;
        let body = SubmitOtpRequest {
            txn_id: txn_id.as_str(),
            otp: otp.as_str(),
        };
        let resp: SubmitOtpResponse = self.post(op, SUBMIT_OTP_PATH, &body).await?;

        match (resp.success, resp.data) {
            (true, Some(data)) => Ok(Verification {
                identity: data.into(),
                message: resp.message,
            }),
            _ => Err(rejected(op, None, resp.message)),
        }
    }
}
