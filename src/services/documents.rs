use tracing::info;

use super::{
    clock::{format_upload_date, Clock},
    trips::TripStore,
};
use crate::{
    error::AppError,
    models::document::{Document, DocumentCapture},
};

/// Records the metadata of a captured document on the trip.
pub async fn attach(
    store: &TripStore,
    clock: &dyn Clock,
    trip_id: &str,
    capture: DocumentCapture,
) -> Result<Document, AppError> {
    let uploaded_on = format_upload_date(clock.now());
    let (trip, document) = store
        .update(trip_id, |trip, _| {
            trip.attach_document(capture.kind, Some(uploaded_on))
        })
        .await?;

    info!(
        trip_id = %trip.id,
        document_id = %document.id,
        kind = %document.kind,
        has_source = capture.source.is_some(),
        "document attached"
    );
    Ok(document)
}

pub async fn list(store: &TripStore, trip_id: &str) -> Result<Vec<Document>, AppError> {
    Ok(store.get(trip_id).await?.documents.clone())
}
