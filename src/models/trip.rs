use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use uuid::Uuid;

use super::{
    checkin::{CheckKind, CheckStamp},
    detention::{DetentionDraft, DetentionRequest, DetentionStatus, DocumentRef, StopRef},
    document::{Document, DocumentType},
    money::Money,
    zone::ZoneCode,
};
use crate::{
    error::{AppError, FieldErrors},
    services::timezone,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Active,
    Processing,
    Completed,
}

impl TripStatus {
    pub const ALL: [TripStatus; 3] = [
        TripStatus::Active,
        TripStatus::Processing,
        TripStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Active => "active",
            TripStatus::Processing => "processing",
            TripStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TripStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown trip status `{s}`"))
    }
}

/// Stable stop identity, assigned once when the trip is created or seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(Uuid);

impl StopId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDetails {
    #[serde(default)]
    pub drop_trailer: bool,
    #[serde(default = "default_handled_by")]
    pub handled_by: String,
    #[serde(default = "default_appointment_type")]
    pub appointment_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_handled_by() -> String {
    "Company".into()
}

fn default_appointment_type() -> String {
    "Appointment".into()
}

impl Default for StopDetails {
    fn default() -> Self {
        Self {
            drop_trailer: false,
            handled_by: default_handled_by(),
            appointment_type: default_appointment_type(),
            comment: None,
        }
    }
}

/// What the driver sees on a stop card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StopProgress {
    NotCheckedIn,
    CheckedIn,
    CheckedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(default = "StopId::generate")]
    pub id: StopId,
    pub name: String,
    pub address: String,
    pub scheduled_at: String,
    #[serde(default)]
    pub check_in_at: Option<CheckStamp>,
    #[serde(default)]
    pub check_out_at: Option<CheckStamp>,
    #[serde(default)]
    pub details: StopDetails,
}

impl Stop {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        scheduled_at: impl Into<String>,
    ) -> Self {
        Self {
            id: StopId::generate(),
            name: name.into(),
            address: address.into(),
            scheduled_at: scheduled_at.into(),
            check_in_at: None,
            check_out_at: None,
            details: StopDetails::default(),
        }
    }

    pub fn zone(&self) -> ZoneCode {
        timezone::resolve(&self.address)
    }

    pub fn stamp(&self, kind: CheckKind) -> Option<&CheckStamp> {
        match kind {
            CheckKind::In => self.check_in_at.as_ref(),
            CheckKind::Out => self.check_out_at.as_ref(),
        }
    }

    pub fn progress(&self) -> StopProgress {
        match (&self.check_in_at, &self.check_out_at) {
            (_, Some(_)) => StopProgress::CheckedOut,
            (Some(_), None) => StopProgress::CheckedIn,
            (None, None) => StopProgress::NotCheckedIn,
        }
    }

    /// Street line of the address (everything before the first comma).
    pub fn street(&self) -> &str {
        self.address
            .split_once(',')
            .map_or(self.address.as_str(), |(street, _)| street)
            .trim()
    }

    /// City and state, without the street line or a trailing ZIP code.
    pub fn locality(&self) -> String {
        let rest = self
            .address
            .split_once(',')
            .map_or(self.address.as_str(), |(_, rest)| rest)
            .trim();
        match rest.rsplit_once(char::is_whitespace) {
            Some((head, last)) if is_zip(last) => head.trim().to_string(),
            _ => rest.to_string(),
        }
    }

    /// Descriptive label used by detention requests, `number` is 1-based.
    pub fn label(&self, number: usize) -> String {
        format!("STOP {number} - {}", self.locality())
    }
}

fn is_zip(token: &str) -> bool {
    let (five, plus_four) = token.split_once('-').unwrap_or((token, ""));
    let digits = |part: &str, len: usize| part.len() == len && part.chars().all(|c| c.is_ascii_digit());
    digits(five, 5) && (plus_four.is_empty() || digits(plus_four, 4))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TripInfo {
    #[serde(default)]
    pub equipment: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub temperature: String,
    #[serde(default)]
    pub miles: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadhead: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub status: TripStatus,
    #[serde(default)]
    pub confirmed: bool,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub info: TripInfo,
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub detention_requests: Vec<DetentionRequest>,
    /// Last document sequence number handed out; never decreases.
    #[serde(default)]
    pub document_seq: u64,
    /// Bumped by the store on every committed mutation.
    #[serde(default)]
    pub version: u64,
}

impl Trip {
    pub fn new(id: impl Into<String>, status: TripStatus) -> Self {
        Self {
            id: id.into(),
            status,
            confirmed: false,
            amount: None,
            info: TripInfo::default(),
            stops: Vec::new(),
            documents: Vec::new(),
            detention_requests: Vec::new(),
            document_seq: 0,
            version: 0,
        }
    }

    pub fn with_stop(mut self, stop: Stop) -> Self {
        self.stops.push(stop);
        self
    }

    /// Brings seeded records in line with the counters the workflows rely on.
    pub fn normalize(&mut self) {
        let highest_numeric = self
            .documents
            .iter()
            .filter_map(|doc| doc.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let count = self.documents.len() as u64;
        self.document_seq = self.document_seq.max(count).max(highest_numeric);
    }

    pub fn is_active(&self) -> bool {
        self.status == TripStatus::Active
    }

    pub fn ensure_active(&self) -> Result<(), AppError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(AppError::TripNotActive(self.status))
        }
    }

    pub fn ensure_writable(&self) -> Result<(), AppError> {
        if self.status == TripStatus::Completed {
            Err(AppError::TripReadOnly)
        } else {
            Ok(())
        }
    }

    pub fn stop_position(&self, stop_id: StopId) -> Option<usize> {
        self.stops.iter().position(|stop| stop.id == stop_id)
    }

    pub fn stop(&self, stop_id: StopId) -> Option<&Stop> {
        self.stops.iter().find(|stop| stop.id == stop_id)
    }

    pub fn origin(&self) -> Option<&Stop> {
        self.stops.first()
    }

    pub fn destination(&self) -> Option<&Stop> {
        self.stops.last()
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Overwrites the check-in or check-out stamp of one stop.
    pub fn apply_check(
        &mut self,
        stop_id: StopId,
        kind: CheckKind,
        stamp: CheckStamp,
    ) -> Result<&Stop, AppError> {
        self.ensure_active()?;
        let index = self.stop_position(stop_id).ok_or(AppError::StopNotFound)?;
        if stamp.time.trim().is_empty() {
            return Err(AppError::Validation(FieldErrors::single(
                "time",
                "Check time is required",
            )));
        }

        let stop = &mut self.stops[index];
        match kind {
            CheckKind::In => stop.check_in_at = Some(stamp),
            CheckKind::Out => stop.check_out_at = Some(stamp),
        }
        Ok(&self.stops[index])
    }

    /// Returns `true` when the flag flipped, `false` when the load was already confirmed.
    pub fn confirm_load(&mut self) -> Result<bool, AppError> {
        self.ensure_active()?;
        let changed = !self.confirmed;
        self.confirmed = true;
        Ok(changed)
    }

    pub fn attach_document(
        &mut self,
        kind: DocumentType,
        uploaded_on: Option<String>,
    ) -> Result<Document, AppError> {
        self.ensure_writable()?;
        self.document_seq += 1;
        let document = Document {
            id: self.document_seq.to_string(),
            name: format!("Document {}", self.documents.len() + 1),
            kind,
            uploaded_on,
        };
        self.documents.push(document.clone());
        Ok(document)
    }

    /// Every stop is offered; whether detention applies is the driver's call.
    pub fn eligible_stops(&self) -> Vec<StopRef> {
        self.stops
            .iter()
            .enumerate()
            .map(|(index, stop)| StopRef {
                stop_id: stop.id,
                number: index + 1,
                label: stop.label(index + 1),
                check_in_at: stop.check_in_at.clone(),
                check_out_at: stop.check_out_at.clone(),
            })
            .collect()
    }

    pub fn create_detention_request(
        &mut self,
        draft: DetentionDraft,
        request_no: u64,
    ) -> Result<DetentionRequest, AppError> {
        self.ensure_active()?;
        let stop_id = draft.stop_id.ok_or(AppError::SelectionRequired)?;
        let index = self.stop_position(stop_id).ok_or(AppError::StopNotFound)?;

        let mut documents: Vec<DocumentRef> = Vec::with_capacity(draft.document_ids.len());
        for id in &draft.document_ids {
            if documents.iter().any(|existing| &existing.id == id) {
                continue;
            }
            let doc = self
                .document(id)
                .ok_or_else(|| AppError::DocumentNotFound(id.clone()))?;
            documents.push(DocumentRef {
                id: doc.id.clone(),
                name: doc.name.clone(),
                uploaded_on: doc.uploaded_on.clone(),
            });
        }

        let stop = &self.stops[index];
        let request = DetentionRequest {
            request_no,
            status: DetentionStatus::Open,
            amount: None,
            stop: stop.label(index + 1),
            stop_id: Some(stop.id),
            check_in_at: stop.check_in_at.clone(),
            check_out_at: stop.check_out_at.clone(),
            documents,
            notes: normalize_optional(draft.notes),
        };
        self.detention_requests.push(request.clone());
        Ok(request)
    }
}

pub fn normalize_optional(input: Option<String>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
