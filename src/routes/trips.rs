use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, FieldErrors},
    models::{
        checkin::{CheckDraft, CheckKind},
        detention::{DetentionDraft, DetentionRequest},
        document::{Document, DocumentCapture},
        trip::{Stop, StopId, StopProgress, Trip, TripInfo, TripStatus},
        zone::ZoneCode,
    },
    routes::extract::{AppJson, AppPath, AppQuery},
    services::{checkin, detention, documents, trips},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips))
        .route("/:id", get(trip_detail))
        .route("/:id/confirm-load", post(confirm_load))
        .route("/:id/stops/:stop_id", get(stop_detail))
        .route("/:id/stops/:stop_id/checks/:kind/draft", post(check_draft))
        .route("/:id/stops/:stop_id/checks/:kind", put(check_commit))
        .route("/:id/documents", get(list_documents).post(attach_document))
        .route("/:id/detention/stops", get(detention_stops))
        .route(
            "/:id/detention",
            get(list_detention_requests).post(create_detention_request),
        )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Endpoint {
    address: String,
    scheduled_at: String,
    zone: ZoneCode,
}

impl Endpoint {
    fn from_stop(stop: &Stop) -> Self {
        Self {
            address: stop.address.clone(),
            scheduled_at: stop.scheduled_at.clone(),
            zone: stop.zone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TripSummary {
    id: String,
    status: TripStatus,
    amount: Option<String>,
    confirmed: bool,
    origin: Option<Endpoint>,
    destination: Option<Endpoint>,
    stops: usize,
    weight: String,
    miles: String,
    deadhead: Option<String>,
}

impl TripSummary {
    fn from_trip(trip: &Trip) -> Self {
        Self {
            id: trip.id.clone(),
            status: trip.status,
            amount: trip.amount.map(|amount| amount.to_string()),
            confirmed: trip.confirmed,
            origin: trip.origin().map(Endpoint::from_stop),
            destination: trip.destination().map(Endpoint::from_stop),
            stops: trip.stops.len(),
            weight: trip.info.weight.clone(),
            miles: trip.info.miles.clone(),
            deadhead: trip.info.deadhead.clone(),
        }
    }
}

#[derive(Serialize, Default)]
struct TripGroups {
    active: Vec<TripSummary>,
    processing: Vec<TripSummary>,
    completed: Vec<TripSummary>,
}

#[derive(Deserialize)]
struct ListQuery {
    status: Option<String>,
}

async fn list_trips(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Response, AppError> {
    if let Some(raw) = query.status {
        let status: TripStatus = raw
            .parse()
            .map_err(|msg: String| AppError::Validation(FieldErrors::single("status", msg)))?;
        let summaries: Vec<TripSummary> = state
            .trips
            .list_by_status(status)
            .await
            .iter()
            .map(|trip| TripSummary::from_trip(trip))
            .collect();
        return Ok(Json(summaries).into_response());
    }

    let mut groups = TripGroups::default();
    for trip in state.trips.list().await {
        let summary = TripSummary::from_trip(&trip);
        match trip.status {
            TripStatus::Active => groups.active.push(summary),
            TripStatus::Processing => groups.processing.push(summary),
            TripStatus::Completed => groups.completed.push(summary),
        }
    }
    Ok(Json(groups).into_response())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StopView<'a> {
    number: usize,
    label: String,
    zone: ZoneCode,
    progress: StopProgress,
    #[serde(flatten)]
    stop: &'a Stop,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TripDetail<'a> {
    id: &'a str,
    status: TripStatus,
    confirmed: bool,
    amount: Option<String>,
    info: &'a TripInfo,
    stops: Vec<StopView<'a>>,
    documents: &'a [Document],
    detention_requests: &'a [DetentionRequest],
    version: u64,
}

fn detail_response(trip: &Trip) -> Response {
    let stops = trip
        .stops
        .iter()
        .enumerate()
        .map(|(index, stop)| StopView {
            number: index + 1,
            label: stop.label(index + 1),
            zone: stop.zone(),
            progress: stop.progress(),
            stop,
        })
        .collect();
    Json(TripDetail {
        id: &trip.id,
        status: trip.status,
        confirmed: trip.confirmed,
        amount: trip.amount.map(|amount| amount.to_string()),
        info: &trip.info,
        stops,
        documents: &trip.documents,
        detention_requests: &trip.detention_requests,
        version: trip.version,
    })
    .into_response()
}

async fn trip_detail(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<String>,
) -> Result<Response, AppError> {
    let trip = state.trips.get(&trip_id).await?;
    Ok(detail_response(&trip))
}

async fn confirm_load(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<String>,
) -> Result<Response, AppError> {
    let trip = trips::confirm_load(&state.trips, &trip_id).await?;
    Ok(detail_response(&trip))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StopDetail<'a> {
    trip_id: &'a str,
    number: usize,
    label: String,
    zone: ZoneCode,
    street: &'a str,
    locality: String,
    #[serde(flatten)]
    stop: &'a Stop,
}

async fn stop_detail(
    State(state): State<AppState>,
    AppPath((trip_id, stop_id)): AppPath<(String, StopId)>,
) -> Result<Response, AppError> {
    let trip = state.trips.get(&trip_id).await?;
    let index = trip.stop_position(stop_id).ok_or(AppError::StopNotFound)?;
    let stop = &trip.stops[index];
    Ok(Json(StopDetail {
        trip_id: &trip.id,
        number: index + 1,
        label: stop.label(index + 1),
        zone: stop.zone(),
        street: stop.street(),
        locality: stop.locality(),
        stop,
    })
    .into_response())
}

async fn check_draft(
    State(state): State<AppState>,
    AppPath((trip_id, stop_id, kind)): AppPath<(String, StopId, CheckKind)>,
) -> Result<Json<CheckDraft>, AppError> {
    let draft =
        checkin::perform_check(&state.trips, state.clock.as_ref(), &trip_id, stop_id, kind).await?;
    Ok(Json(draft))
}

#[derive(Deserialize)]
struct CommitBody {
    time: String,
    zone: ZoneCode,
}

async fn check_commit(
    State(state): State<AppState>,
    AppPath((trip_id, stop_id, kind)): AppPath<(String, StopId, CheckKind)>,
    AppJson(body): AppJson<CommitBody>,
) -> Result<Response, AppError> {
    let draft = CheckDraft {
        trip_id,
        stop_id,
        kind,
        time: body.time,
        zone: body.zone,
    };
    let trip = checkin::commit_check(&state.trips, draft).await?;
    Ok(detail_response(&trip))
}

async fn list_documents(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<String>,
) -> Result<Json<Vec<Document>>, AppError> {
    Ok(Json(documents::list(&state.trips, &trip_id).await?))
}

async fn attach_document(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<String>,
    AppJson(capture): AppJson<DocumentCapture>,
) -> Result<impl IntoResponse, AppError> {
    let document =
        documents::attach(&state.trips, state.clock.as_ref(), &trip_id, capture).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

async fn detention_stops(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(detention::list_eligible_stops(&state.trips, &trip_id).await?))
}

async fn list_detention_requests(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<String>,
) -> Result<Json<Vec<DetentionRequest>>, AppError> {
    let trip = state.trips.get(&trip_id).await?;
    Ok(Json(trip.detention_requests.clone()))
}

async fn create_detention_request(
    State(state): State<AppState>,
    AppPath(trip_id): AppPath<String>,
    AppJson(draft): AppJson<DetentionDraft>,
) -> Result<impl IntoResponse, AppError> {
    let request = detention::create_request(&state.trips, &trip_id, draft).await?;
    Ok((StatusCode::CREATED, Json(request)))
}
