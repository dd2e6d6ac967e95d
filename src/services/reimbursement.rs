use chrono::NaiveDate;
use tracing::info;

use super::trips::TripStore;
use crate::{
    error::{AppError, FieldErrors},
    models::{
        money::Money,
        reimbursement::{ReimbursementDraft, ReimbursementRequest, ReimbursementStatus},
        trip::normalize_optional,
    },
};

const DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEntry {
    pub trip_id: String,
    pub merchant: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub notes: Option<String>,
    pub receipt_attached: bool,
}

/// Local form validation; nothing here touches the store.
pub fn validate(draft: ReimbursementDraft) -> Result<ValidEntry, AppError> {
    let mut errors = FieldErrors::new();

    let trip_id = draft.trip_id.trim().to_string();
    if trip_id.is_empty() {
        errors.add("tripId", "Trip is required");
    }

    let merchant = draft.merchant.trim().to_string();
    if merchant.is_empty() {
        errors.add("merchant", "Merchant is required");
    }

    let date = match draft.date.trim() {
        "" => {
            errors.add("date", "Date is required");
            None
        }
        raw => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|_| errors.add("date", "Date must be MM/DD/YYYY"))
            .ok(),
    };

    let amount = match draft.amount.trim() {
        "" => {
            errors.add("amount", "Amount is required");
            None
        }
        raw => match raw.parse::<Money>() {
            Ok(amount) if amount.is_zero() => {
                errors.add("amount", "Amount must be greater than zero");
                None
            }
            Ok(amount) => Some(amount),
            Err(_) => {
                errors.add("amount", "Amount must look like $0.00");
                None
            }
        },
    };

    match (date, amount) {
        (Some(date), Some(amount)) if errors.is_empty() => Ok(ValidEntry {
            trip_id,
            merchant,
            date,
            amount,
            notes: normalize_optional(draft.notes),
            receipt_attached: draft.receipt_attached,
        }),
        _ => Err(AppError::Validation(errors)),
    }
}

pub async fn submit(
    store: &TripStore,
    draft: ReimbursementDraft,
) -> Result<ReimbursementRequest, AppError> {
    let entry = validate(draft)?;
    let trip_id = entry.trip_id.clone();
    let request = store
        .file_reimbursement(&trip_id, |request_no| ReimbursementRequest {
            request_no,
            amount: entry.amount,
            status: ReimbursementStatus::Open,
            trip_id: entry.trip_id,
            merchant: entry.merchant,
            date: Some(entry.date),
            notes: entry.notes,
            receipt_attached: entry.receipt_attached,
        })
        .await?;

    info!(
        trip_id = %request.trip_id,
        request_no = request.request_no,
        amount = %request.amount,
        receipt = request.receipt_attached,
        "reimbursement submitted"
    );
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::{Trip, TripStatus};

    fn draft() -> ReimbursementDraft {
        ReimbursementDraft {
            trip_id: "1000077".into(),
            merchant: "Pilot Flying J".into(),
            date: "01/18/2023".into(),
            amount: "$76.00".into(),
            notes: Some("   ".into()),
            receipt_attached: true,
        }
    }

    #[test]
    fn valid_form_passes() {
        let entry = validate(draft()).unwrap();
        assert_eq!(entry.amount, Money::from_dollars(76));
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2023, 1, 18).unwrap());
        assert_eq!(entry.notes, None);
    }

    #[test]
    fn every_bad_field_is_reported() {
        let bad = ReimbursementDraft {
            trip_id: " ".into(),
            merchant: String::new(),
            date: "2023-01-18".into(),
            amount: "$0".into(),
            ..draft()
        };
        let Err(AppError::Validation(errors)) = validate(bad) else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("date"), Some("Date must be MM/DD/YYYY"));
        assert_eq!(errors.get("amount"), Some("Amount must be greater than zero"));
    }

    #[tokio::test]
    async fn submit_files_open_request_against_trip() {
        let store = TripStore::seeded(vec![Trip::new("1000077", TripStatus::Active)], Vec::new());
        let request = submit(&store, draft()).await.unwrap();
        assert_eq!(request.status, ReimbursementStatus::Open);
        assert_eq!(request.request_no, 1001);
        assert_eq!(store.reimbursements().await.len(), 1);

        let orphan = ReimbursementDraft {
            trip_id: "999".into(),
            ..draft()
        };
        assert!(matches!(submit(&store, orphan).await, Err(AppError::NotFound)));
        assert_eq!(store.reimbursements().await.len(), 1);
    }
}
