use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReimbursementStatus {
    #[default]
    Open,
    Approved,
    Declined,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReimbursementRequest {
    #[serde_as(as = "DisplayFromStr")]
    pub request_no: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Money,
    #[serde(default)]
    pub status: ReimbursementStatus,
    pub trip_id: String,
    #[serde(default)]
    pub merchant: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub receipt_attached: bool,
}

/// Expense entry exactly as typed on the form; validated on submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReimbursementDraft {
    #[serde(default)]
    pub trip_id: String,
    #[serde(default)]
    pub merchant: String,
    /// `MM/DD/YYYY`
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub receipt_attached: bool,
}
