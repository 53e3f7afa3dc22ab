//! Explicit API session context.
//!
//! Every client is constructed from an [`ApiSession`] rather than reading the
//! base origin or bearer token from ambient global state.

use std::fmt;

use http::HeaderValue;
use url::Url;

/// Errors building an [`ApiSession`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiSessionError {
    #[error("api base url must be an absolute http(s) url with a host: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid api path {0:?}")]
    InvalidPath(String),
    #[error("bearer token contains characters not allowed in a header")]
    InvalidToken,
}

/// Base API origin plus the optional bearer token sent with every request.
#[derive(Clone)]
pub struct ApiSession {
    base_url: Url,
    authorization: Option<HeaderValue>,
}

impl ApiSession {
    /// Anonymous session against `base_url`.
    ///
    /// Query and fragment are dropped; a path prefix such as `/v1` is kept.
    pub fn new(base_url: &str) -> Result<Self, ApiSessionError> {
        let invalid = || ApiSessionError::InvalidBaseUrl(base_url.to_owned());
        let mut url = Url::parse(base_url.trim()).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid());
        }
        url.set_query(None);
        url.set_fragment(None);
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            authorization: None,
        })
    }

    /// Attach a bearer token. Blank tokens leave the session anonymous.
    pub fn with_token(mut self, token: &str) -> Result<Self, ApiSessionError> {
        let token = token.trim();
        if token.is_empty() {
            self.authorization = None;
            return Ok(self);
        }
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiSessionError::InvalidToken)?;
        value.set_sensitive(true);
        self.authorization = Some(value);
        Ok(self)
    }

    /// Base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/api/kyc/aadhaar/generate-otp`,
    /// resolved under the base path.
    pub fn url(&self, path: &str) -> Result<Url, ApiSessionError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| ApiSessionError::InvalidPath(path.to_owned()))
    }

    /// `Authorization` header value, if a token is attached.
    pub fn authorization(&self) -> Option<&HeaderValue> {
        self.authorization.as_ref()
    }
}

impl fmt::Debug for ApiSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSession")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.authorization.is_some())
            .finish()
    }
}
