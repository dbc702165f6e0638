//! Type-safe enumerations for EDI transactions.
//!
//! Transaction types and statuses travel as strings in files, CLI flags and
//! status-update requests; these enums give them compile-time checking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// HIPAA X12 transaction set handled by the ingestion engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TransactionType {
    /// 837P: Professional claim.
    ClaimProfessional,
    /// 837I: Institutional claim.
    ClaimInstitutional,
    /// 837D: Dental claim.
    ClaimDental,
    /// 835: Claim payment / remittance advice.
    Remittance,
    /// 270: Eligibility inquiry.
    EligibilityInquiry,
    /// 271: Eligibility response.
    EligibilityResponse,
    /// 276: Claim status request.
    ClaimStatusRequest,
    /// 277: Claim status response.
    ClaimStatusResponse,
    /// 278: Prior authorization / referral.
    PriorAuthorization,
    /// 834: Benefit enrollment.
    Enrollment,
    /// 820: Premium payment.
    PremiumPayment,
}

impl TransactionType {
    /// X12 transaction set identifier as it appears in `ST01`.
    pub fn code(&self) -> &'static str {
        match self {
            TransactionType::ClaimProfessional
            | TransactionType::ClaimInstitutional
            | TransactionType::ClaimDental => "837",
            TransactionType::Remittance => "835",
            TransactionType::EligibilityInquiry => "270",
            TransactionType::EligibilityResponse => "271",
            TransactionType::ClaimStatusRequest => "276",
            TransactionType::ClaimStatusResponse => "277",
            TransactionType::PriorAuthorization => "278",
            TransactionType::Enrollment => "834",
            TransactionType::PremiumPayment => "820",
        }
    }

    /// Short label, e.g. `837P`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::ClaimProfessional => "837P",
            TransactionType::ClaimInstitutional => "837I",
            TransactionType::ClaimDental => "837D",
            other => other.code(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TransactionType::ClaimProfessional => "Professional Claim",
            TransactionType::ClaimInstitutional => "Institutional Claim",
            TransactionType::ClaimDental => "Dental Claim",
            TransactionType::Remittance => "Claim Payment/Remittance Advice",
            TransactionType::EligibilityInquiry => "Eligibility Inquiry",
            TransactionType::EligibilityResponse => "Eligibility Response",
            TransactionType::ClaimStatusRequest => "Claim Status Request",
            TransactionType::ClaimStatusResponse => "Claim Status Response",
            TransactionType::PriorAuthorization => "Prior Authorization",
            TransactionType::Enrollment => "Benefit Enrollment",
            TransactionType::PremiumPayment => "Premium Payment",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::ClaimProfessional,
            Self::ClaimInstitutional,
            Self::ClaimDental,
            Self::Remittance,
            Self::EligibilityInquiry,
            Self::EligibilityResponse,
            Self::ClaimStatusRequest,
            Self::ClaimStatusResponse,
            Self::PriorAuthorization,
            Self::Enrollment,
            Self::PremiumPayment,
        ]
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ModelError;

    /// Parses labels (`837P`, `835`) and variant names (`Remittance`), case-insensitive.
    /// A bare `837` is a professional claim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['_', '-', ' '], "");
        match normalized.as_str() {
            "837" | "837P" | "CLAIMPROFESSIONAL" => Ok(TransactionType::ClaimProfessional),
            "837I" | "CLAIMINSTITUTIONAL" => Ok(TransactionType::ClaimInstitutional),
            "837D" | "CLAIMDENTAL" => Ok(TransactionType::ClaimDental),
            "835" | "REMITTANCE" => Ok(TransactionType::Remittance),
            "270" | "ELIGIBILITYINQUIRY" => Ok(TransactionType::EligibilityInquiry),
            "271" | "ELIGIBILITYRESPONSE" => Ok(TransactionType::EligibilityResponse),
            "276" | "CLAIMSTATUSREQUEST" => Ok(TransactionType::ClaimStatusRequest),
            "277" | "CLAIMSTATUSRESPONSE" => Ok(TransactionType::ClaimStatusResponse),
            "278" | "PRIORAUTHORIZATION" => Ok(TransactionType::PriorAuthorization),
            "834" | "ENROLLMENT" => Ok(TransactionType::Enrollment),
            "820" | "PREMIUMPAYMENT" => Ok(TransactionType::PremiumPayment),
            _ => Err(ModelError::UnknownTransactionType(s.to_string())),
        }
    }
}

/// Lifecycle status of a submitted transaction.
///
/// `PENDING` is transient during submission. `SENT` and `ERROR` are the
/// submission outcomes. `ACCEPTED` and `REJECTED` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Sent,
    Accepted,
    Rejected,
    Error,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Sent => "SENT",
            TransactionStatus::Accepted => "ACCEPTED",
            TransactionStatus::Rejected => "REJECTED",
            TransactionStatus::Error => "ERROR",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Accepted | TransactionStatus::Rejected
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(TransactionStatus::Pending),
            "SENT" => Ok(TransactionStatus::Sent),
            "ACCEPTED" => Ok(TransactionStatus::Accepted),
            "REJECTED" => Ok(TransactionStatus::Rejected),
            "ERROR" => Ok(TransactionStatus::Error),
            _ => Err(ModelError::UnknownStatus(s.to_string())),
        }
    }
}
