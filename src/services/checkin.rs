use std::sync::Arc;

use tracing::{info, warn};

use super::{
    clock::{format_check_time, Clock},
    trips::TripStore,
};
use crate::{
    error::AppError,
    models::{
        checkin::{CheckDraft, CheckKind},
        trip::{StopId, Trip},
    },
};

/// Opens the edit buffer for a check-in/out: current wall-clock time and the stop's zone.
pub async fn perform_check(
    store: &TripStore,
    clock: &dyn Clock,
    trip_id: &str,
    stop_id: StopId,
    kind: CheckKind,
) -> Result<CheckDraft, AppError> {
    let trip = store.get(trip_id).await?;
    trip.ensure_active()?;
    let stop = trip.stop(stop_id).ok_or(AppError::StopNotFound)?;

    Ok(CheckDraft {
        trip_id: trip.id.clone(),
        stop_id,
        kind,
        time: format_check_time(clock.now()),
        zone: stop.zone(),
    })
}

/// Writes the (possibly edited) draft over the stop's previous value for that kind.
pub async fn commit_check(store: &TripStore, draft: CheckDraft) -> Result<Arc<Trip>, AppError> {
    let stamp = draft.stamp();
    let result = store
        .update(&draft.trip_id, |trip, _| {
            trip.apply_check(draft.stop_id, draft.kind, stamp).map(|_| ())
        })
        .await;

    match result {
        Ok((trip, ())) => {
            info!(
                trip_id = %trip.id,
                stop_id = %draft.stop_id,
                kind = %draft.kind,
                zone = %draft.zone,
                version = trip.version,
                "check committed"
            );
            Ok(trip)
        }
        Err(err) => {
            warn!(
                trip_id = %draft.trip_id,
                stop_id = %draft.stop_id,
                kind = %draft.kind,
                error = %err,
                "check rejected"
            );
            Err(err)
        }
    }
}
