//! Identity data returned by a successful Aadhaar OTP verification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Country used when the backend omits one.
pub const DEFAULT_COUNTRY: &str = "India";

/// Structured address as reported by the KYC backend.
///
/// Every sub-field is optional; blank strings are treated as missing. Fields
/// the address line does not use (such as `house`) are ignored on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AadhaarAddress {
    pub street: Option<String>,
    pub landmark: Option<String>,
    #[serde(alias = "city")]
    pub dist: Option<String>,
    pub po: Option<String>,
    pub loc: Option<String>,
    pub subdist: Option<String>,
    pub vtc: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl AadhaarAddress {
    /// Flatten into a single display line.
    ///
    /// Order: street (else landmark), then the first of
    /// district / post office / locality / sub-district / village-town-city,
    /// then state, country (default India) and postal code. `zip` wins over
    /// `pincode` when both are present. Missing parts are skipped.
    pub fn compose(&self, zip: Option<&str>) -> String {
        let line = present(&self.street).or_else(|| present(&self.landmark));
        let locality = [&self.dist, &self.po, &self.loc, &self.subdist, &self.vtc]
            .into_iter()
            .find_map(present);
        let country = present(&self.country).unwrap_or(DEFAULT_COUNTRY);
        let postal = zip
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| present(&self.pincode));

        [line, locality, present(&self.state), Some(country), postal]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Identity fields confirmed by the backend after OTP verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub full_name: String,
    /// Parsed date of birth; `None` when the backend value is missing or unparseable.
    pub dob: Option<NaiveDate>,
    /// Date of birth exactly as sent by the backend.
    pub dob_raw: Option<String>,
    /// Composed single-line address (see [`AadhaarAddress::compose`]).
    pub address: String,
    /// Identity number echoed by the backend (usually masked).
    pub aadhaar_number: Option<String>,
}

/// Parse a backend date of birth. Accepts `YYYY-MM-DD`, `DD-MM-YYYY` and `DD/MM/YYYY`.
pub fn parse_dob(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"]
        .into_iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
