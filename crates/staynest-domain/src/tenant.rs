//! Tenant-creation form state and the rules for merging verified identity into it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::AadhaarNumber;
use crate::identity::VerifiedIdentity;

/// Form fields that verified identity data may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantField {
    Name,
    Phone,
    Dob,
    Address,
}

impl TenantField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Dob => "date of birth",
            Self::Address => "address",
        }
    }
}

/// A pre-filled field whose value differs from the verified identity.
///
/// The form keeps `current`; callers surface the conflict as a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConflict {
    pub field: TenantField,
    pub current: String,
    pub verified: String,
}

/// In-progress tenant-creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantForm {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub dob: Option<NaiveDate>,
    pub address: String,
    aadhaar_number: String,
    aadhaar_locked: bool,
}

/// Snapshot handed off when the form is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantSubmission {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub dob: Option<NaiveDate>,
    pub address: String,
    pub aadhaar_number: Option<String>,
    pub aadhaar_verified: bool,
}

/// Returned by [`TenantForm::set_aadhaar_number`] once the identity is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("aadhaar number is locked after verification")]
pub struct AadhaarLocked;

fn normalized(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl TenantForm {
    pub fn aadhaar_number(&self) -> &str {
        &self.aadhaar_number
    }

    pub fn is_aadhaar_locked(&self) -> bool {
        self.aadhaar_locked
    }

    /// Update the raw identity number input. Rejected once verification has succeeded.
    pub fn set_aadhaar_number(&mut self, value: impl Into<String>) -> Result<(), AadhaarLocked> {
        if self.aadhaar_locked {
            return Err(AadhaarLocked);
        }
        self.aadhaar_number = value.into();
        Ok(())
    }

    /// Merge verified identity fields into the form and lock the identity number
    /// to `verified`, the number the OTP was issued for.
    ///
    /// Only empty fields are filled. A populated field that disagrees with the
    /// verified value is left alone and reported back.
    pub fn apply_identity(
        &mut self,
        verified: &AadhaarNumber,
        identity: &VerifiedIdentity,
    ) -> Vec<FieldConflict> {
        let mut conflicts = Vec::new();

        let name = identity.full_name.trim();
        if self.name.trim().is_empty() {
            self.name = name.to_owned();
        } else if !name.is_empty() && normalized(&self.name) != normalized(name) {
            conflicts.push(FieldConflict {
                field: TenantField::Name,
                current: self.name.clone(),
                verified: name.to_owned(),
            });
        }

        match (self.dob, identity.dob) {
            (None, Some(dob)) => self.dob = Some(dob),
            (Some(current), Some(dob)) if current != dob => conflicts.push(FieldConflict {
                field: TenantField::Dob,
                current: current.to_string(),
                verified: dob.to_string(),
            }),
            _ => {}
        }

        if self.address.trim().is_empty() {
            self.address = identity.address.clone();
        } else if !identity.address.is_empty()
            && normalized(&self.address) != normalized(&identity.address)
        {
            conflicts.push(FieldConflict {
                field: TenantField::Address,
                current: self.address.clone(),
                verified: identity.address.clone(),
            });
        }

        self.aadhaar_number = verified.as_str().to_owned();
        self.aadhaar_locked = true;
        conflicts
    }

    /// Required-field check run before submission. Returns the first missing field.
    pub fn missing_required(&self) -> Option<TenantField> {
        if self.name.trim().is_empty() {
            Some(TenantField::Name)
        } else if self.phone.trim().is_empty() {
            Some(TenantField::Phone)
        } else {
            None
        }
    }

    pub fn to_submission(&self) -> TenantSubmission {
        let aadhaar = self.aadhaar_number.trim();
        TenantSubmission {
            name: self.name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            email: self.email.clone().filter(|e| !e.trim().is_empty()),
            dob: self.dob,
            address: self.address.trim().to_owned(),
            aadhaar_number: (!aadhaar.is_empty()).then(|| aadhaar.to_owned()),
            aadhaar_verified: self.aadhaar_locked,
        }
    }
}
