use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use super::{checkin::CheckStamp, money::Money, trip::StopId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DetentionStatus {
    #[default]
    Open,
    Closed,
}

/// Evidence attached to a detention request, copied from the trip's document list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_on: Option<String>,
}

/// A submitted detention-pay request.
///
/// `check_in_at` / `check_out_at` are copies taken at creation time; later
/// corrections on the stop do not flow back into a submitted request.
/// `status` and `amount` are owned by the business office once submitted.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetentionRequest {
    #[serde_as(as = "DisplayFromStr")]
    pub request_no: u64,
    #[serde(default)]
    pub status: DetentionStatus,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub amount: Option<Money>,
    pub stop: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_id: Option<StopId>,
    #[serde(default)]
    pub check_in_at: Option<CheckStamp>,
    #[serde(default)]
    pub check_out_at: Option<CheckStamp>,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The detention form as the driver fills it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DetentionDraft {
    #[serde(default)]
    pub stop_id: Option<StopId>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub document_ids: Vec<String>,
}

impl DetentionDraft {
    pub fn for_stop(stop_id: StopId) -> Self {
        Self {
            stop_id: Some(stop_id),
            ..Self::default()
        }
    }
}

/// A stop offered for selection on the detention form, with its current times for pre-fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRef {
    pub stop_id: StopId,
    pub number: usize,
    pub label: String,
    pub check_in_at: Option<CheckStamp>,
    pub check_out_at: Option<CheckStamp>,
}

/// Row of the cross-trip detention list.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetentionSummary {
    #[serde_as(as = "DisplayFromStr")]
    pub request_no: u64,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub amount: Option<Money>,
    pub status: DetentionStatus,
    pub trip_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::zone::ZoneCode;

    #[test]
    fn wire_shape_uses_string_numbers_and_dollar_amounts() {
        let request = DetentionRequest {
            request_no: 1001,
            status: DetentionStatus::Closed,
            amount: Some(Money::from_dollars(76)),
            stop: "STOP 1 - Willowbrook, IL".into(),
            stop_id: None,
            check_in_at: Some(CheckStamp::new("Aug 5, 2023, 08:26", ZoneCode::Cst)),
            check_out_at: None,
            documents: Vec::new(),
            notes: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["requestNo"], "1001");
        assert_eq!(value["amount"], "$76.00");
        assert_eq!(value["status"], "Closed");
        assert_eq!(value["checkInAt"]["zone"], "CST");
        assert!(value["checkOutAt"].is_null());

        let back: DetentionRequest = serde_json::from_value(value).unwrap();
        assert_eq!(back, request);
    }
}
