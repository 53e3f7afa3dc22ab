//! Validated newtypes for the identifiers exchanged with the KYC backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of digits in an Aadhaar identity number.
pub const AADHAAR_LEN: usize = 12;

/// Number of digits in an Aadhaar OTP.
pub const OTP_LEN: usize = 6;

/// Errors returned when parsing identifiers from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("aadhaar number must be exactly 12 digits")]
    InvalidAadhaarNumber,
    #[error("otp must be exactly 6 digits")]
    InvalidOtp,
    #[error("transaction id must not be empty")]
    EmptyTxnId,
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// A 12-digit Aadhaar identity number.
///
/// Accepts the printed `1234 5678 9012` grouping; the stored form has no spaces.
/// `Debug` and [`AadhaarNumber::masked`] never reveal more than the last four digits.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AadhaarNumber(String);

impl AadhaarNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `XXXXXXXX9012`, safe for logs.
    pub fn masked(&self) -> String {
        let (hidden, tail) = self.0.split_at(AADHAAR_LEN - 4);
        format!("{}{}", "X".repeat(hidden.len()), tail)
    }
}

impl fmt::Debug for AadhaarNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AadhaarNumber").field(&self.masked()).finish()
    }
}

impl FromStr for AadhaarNumber {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.trim().chars().filter(|c| *c != ' ').collect();
        if is_digits(&compact, AADHAAR_LEN) {
            Ok(Self(compact))
        } else {
            Err(ParseError::InvalidAadhaarNumber)
        }
    }
}

impl TryFrom<String> for AadhaarNumber {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AadhaarNumber> for String {
    fn from(value: AadhaarNumber) -> Self {
        value.0
    }
}

/// A 6-digit one-time password as typed by the user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OtpCode(String);

impl OtpCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(******)")
    }
}

impl FromStr for OtpCode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if is_digits(s, OTP_LEN) {
            Ok(Self(s.to_owned()))
        } else {
            Err(ParseError::InvalidOtp)
        }
    }
}

impl TryFrom<String> for OtpCode {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OtpCode> for String {
    fn from(value: OtpCode) -> Self {
        value.0
    }
}

/// Opaque transaction token binding an OTP request to its verification call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxnId(String);

impl TxnId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TxnId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err(ParseError::EmptyTxnId)
        } else {
            Ok(Self(s.to_owned()))
        }
    }
}

impl TryFrom<String> for TxnId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TxnId> for String {
    fn from(value: TxnId) -> Self {
        value.0
    }
}
