use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============ Credit Report Aggregate ============

/// The fixed-shape record produced from one bureau document.
///
/// Every field is always present: absent source leaves become `0` or `""`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditReportAggregate {
    /// Applicant identity and bureau score.
    pub personal_info: PersonalInfo,
    /// Portfolio-level counters and balances.
    pub summary_details: SummaryDetails,
    /// Accounts in source document order.
    pub accounts_list: Vec<AccountRecord>,
}

/// Applicant identity as reported by the bureau.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    /// First and last name joined by a single space.
    pub full_name: String,
    pub phone_number: String,
    /// Income-tax PAN taken from the first account's holder details.
    pub pan_number: String,
    pub credit_score: i64,
}

/// Account and enquiry totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetails {
    pub total_accounts: i64,
    pub active_accounts: i64,
    pub closed_accounts: i64,
    /// Outstanding balance across all accounts, in the bureau's unit.
    pub total_balance: f64,
    pub secured_amount: f64,
    pub unsecured_amount: f64,
    /// Enquiries in the last seven days.
    pub recent_enquiries: i64,
}

/// One credit account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub account_number: String,
    /// Subscriber (lender) name.
    pub bank_name: String,
    pub current_balance: f64,
    pub overdue_amount: f64,
    /// Holder address lines joined by `", "`.
    pub address: String,
}

// ============ Stored Reports ============

/// A persisted aggregate with its storage-assigned identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCreditReport {
    /// Unique identifier assigned at insert time.
    pub id: Uuid,
    #[serde(flatten)]
    pub report: CreditReportAggregate,
    /// SHA-256 (hex) of the uploaded document bytes.
    pub source_digest: String,
    /// Timestamp of creation.
    pub created_on: DateTime<Utc>,
}

// ============ API Request/Response Models ============

/// Response payload for a successful upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Message describing the result.
    pub message: String,
    /// Identifier of the stored report.
    pub id: Uuid,
}
