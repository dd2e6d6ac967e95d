//! Session-scoped trip store.
//!
//! Trips are held as immutable `Arc<Trip>` versions keyed by id. A mutation
//! clones the latest version, edits the copy and swaps it in under the write
//! lock; if the mutation fails the stored version is untouched. Every commit
//! bumps `Trip::version` and is announced on the change feed.

use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::{
    error::AppError,
    models::{
        detention::DetentionSummary,
        reimbursement::ReimbursementRequest,
        trip::{Trip, TripStatus},
    },
};

/// Request numbers below this are reserved for records created outside the app.
const FIRST_REQUEST_NO: u64 = 1001;
const CHANGE_FEED_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripChanged {
    pub trip_id: String,
    pub version: u64,
}

/// Store-wide request number counters. Each holds the last number handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequences {
    detention: u64,
    reimbursement: u64,
}

impl Default for Sequences {
    fn default() -> Self {
        Self {
            detention: FIRST_REQUEST_NO - 1,
            reimbursement: FIRST_REQUEST_NO - 1,
        }
    }
}

impl Sequences {
    pub fn next_detention(&mut self) -> u64 {
        self.detention += 1;
        self.detention
    }

    pub fn next_reimbursement(&mut self) -> u64 {
        self.reimbursement += 1;
        self.reimbursement
    }

    fn observe_trip(&mut self, trip: &Trip) {
        if let Some(highest) = trip.detention_requests.iter().map(|r| r.request_no).max() {
            self.detention = self.detention.max(highest);
        }
    }

    fn observe_reimbursement(&mut self, request: &ReimbursementRequest) {
        self.reimbursement = self.reimbursement.max(request.request_no);
    }
}

#[derive(Debug, Default)]
struct Inner {
    trips: BTreeMap<String, Arc<Trip>>,
    reimbursements: Vec<ReimbursementRequest>,
    sequences: Sequences,
}

impl Inner {
    fn put(&mut self, mut trip: Trip) {
        trip.normalize();
        self.sequences.observe_trip(&trip);
        self.trips.insert(trip.id.clone(), Arc::new(trip));
    }
}

#[derive(Clone)]
pub struct TripStore {
    inner: Arc<RwLock<Inner>>,
    changes: broadcast::Sender<TripChanged>,
}

impl Default for TripStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TripStore {
    pub fn new() -> Self {
        Self::seeded(Vec::new(), Vec::new())
    }

    pub fn seeded(trips: Vec<Trip>, reimbursements: Vec<ReimbursementRequest>) -> Self {
        let mut inner = Inner::default();
        for trip in trips {
            inner.put(trip);
        }
        for request in &reimbursements {
            inner.sequences.observe_reimbursement(request);
        }
        inner.reimbursements = reimbursements;

        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(inner)),
            changes,
        }
    }

    pub async fn get(&self, trip_id: &str) -> Result<Arc<Trip>, AppError> {
        self.inner
            .read()
            .await
            .trips
            .get(trip_id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    pub async fn list(&self) -> Vec<Arc<Trip>> {
        self.inner.read().await.trips.values().cloned().collect()
    }

    pub async fn list_by_status(&self, status: TripStatus) -> Vec<Arc<Trip>> {
        self.inner
            .read()
            .await
            .trips
            .values()
            .filter(|trip| trip.status == status)
            .cloned()
            .collect()
    }

    /// Applies `mutation` to a private copy of the trip and publishes the copy on success.
    pub async fn update<T, F>(&self, trip_id: &str, mutation: F) -> Result<(Arc<Trip>, T), AppError>
    where
        F: FnOnce(&mut Trip, &mut Sequences) -> Result<T, AppError>,
    {
        let mut inner = self.inner.write().await;
        let current = inner.trips.get(trip_id).ok_or(AppError::NotFound)?;
        let mut draft = Trip::clone(current);
        let mut sequences = inner.sequences;

        let output = mutation(&mut draft, &mut sequences)?;
        if draft.id != trip_id {
            return Err(AppError::Other(anyhow::anyhow!(
                "mutation of trip {trip_id} changed its id"
            )));
        }
        draft.version = current.version + 1;

        let next = Arc::new(draft);
        inner.trips.insert(trip_id.to_string(), Arc::clone(&next));
        inner.sequences = sequences;
        drop(inner);

        debug!(trip_id, version = next.version, "trip replaced");
        // No receivers is fine; the feed is best effort.
        let _ = self.changes.send(TripChanged {
            trip_id: trip_id.to_string(),
            version: next.version,
        });
        Ok((next, output))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TripChanged> {
        self.changes.subscribe()
    }

    pub async fn detention_overview(&self) -> Vec<DetentionSummary> {
        let inner = self.inner.read().await;
        inner
            .trips
            .values()
            .flat_map(|trip| {
                trip.detention_requests.iter().map(|request| DetentionSummary {
                    request_no: request.request_no,
                    amount: request.amount,
                    status: request.status,
                    trip_id: trip.id.clone(),
                })
            })
            .collect()
    }

    /// Files a reimbursement against an existing trip; `build` receives the assigned number.
    pub async fn file_reimbursement<F>(
        &self,
        trip_id: &str,
        build: F,
    ) -> Result<ReimbursementRequest, AppError>
    where
        F: FnOnce(u64) -> ReimbursementRequest,
    {
        let mut inner = self.inner.write().await;
        if !inner.trips.contains_key(trip_id) {
            return Err(AppError::NotFound);
        }
        let request_no = inner.sequences.next_reimbursement();
        let request = build(request_no);
        inner.reimbursements.push(request.clone());
        Ok(request)
    }

    pub async fn reimbursements(&self) -> Vec<ReimbursementRequest> {
        self.inner.read().await.reimbursements.clone()
    }
}

/// Marks the load as confirmed by the driver. Repeating it is harmless.
pub async fn confirm_load(store: &TripStore, trip_id: &str) -> Result<Arc<Trip>, AppError> {
    let (trip, changed) = store.update(trip_id, |trip, _| trip.confirm_load()).await?;
    if changed {
        info!(trip_id, version = trip.version, "load confirmed");
    }
    Ok(trip)
}
