use tracing::{info, warn};

use super::trips::TripStore;
use crate::{
    error::AppError,
    models::detention::{DetentionDraft, DetentionRequest, StopRef},
};

pub async fn list_eligible_stops(store: &TripStore, trip_id: &str) -> Result<Vec<StopRef>, AppError> {
    Ok(store.get(trip_id).await?.eligible_stops())
}

/// Submits the detention form. The stop's current check-in/out values are copied into the request.
pub async fn create_request(
    store: &TripStore,
    trip_id: &str,
    draft: DetentionDraft,
) -> Result<DetentionRequest, AppError> {
    let result = store
        .update(trip_id, |trip, sequences| {
            // Validate before burning a request number.
            trip.ensure_active()?;
            if draft.stop_id.is_none() {
                return Err(AppError::SelectionRequired);
            }
            let request_no = sequences.next_detention();
            trip.create_detention_request(draft, request_no)
        })
        .await;

    match result {
        Ok((trip, request)) => {
            info!(
                trip_id = %trip.id,
                request_no = request.request_no,
                stop = %request.stop,
                documents = request.documents.len(),
                "detention request created"
            );
            Ok(request)
        }
        Err(err) => {
            warn!(trip_id, error = %err, "detention request rejected");
            Err(err)
        }
    }
}
