use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::{
    error::AppError,
    models::{
        detention::DetentionSummary,
        reimbursement::{ReimbursementDraft, ReimbursementRequest},
    },
    routes::extract::AppJson,
    services::reimbursement,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/detention", get(detention_overview))
        .route(
            "/reimbursements",
            get(list_reimbursements).post(submit_reimbursement),
        )
}

async fn detention_overview(State(state): State<AppState>) -> Json<Vec<DetentionSummary>> {
    Json(state.trips.detention_overview().await)
}

async fn list_reimbursements(State(state): State<AppState>) -> Json<Vec<ReimbursementRequest>> {
    Json(state.trips.reimbursements().await)
}

async fn submit_reimbursement(
    State(state): State<AppState>,
    AppJson(draft): AppJson<ReimbursementDraft>,
) -> Result<impl IntoResponse, AppError> {
    let request = reimbursement::submit(&state.trips, draft).await?;
    Ok((StatusCode::CREATED, Json(request)))
}
