use axum::{extract::State, routing::{get, post}, Json, Router};
use serde::Serialize;

use crate::{
    auth::{AuthToken, Credentials},
    config::AppEnv,
    error::AppError,
    routes::extract::AppJson,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/environment", get(environment))
        .route("/login", post(login))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentInfo {
    env: AppEnv,
    app_name: String,
    api_url: String,
}

async fn environment(State(state): State<AppState>) -> Json<EnvironmentInfo> {
    Json(EnvironmentInfo {
        env: state.config.env,
        app_name: state.config.app_name.clone(),
        api_url: state.config.auth_api_url.to_string(),
    })
}

async fn login(
    State(state): State<AppState>,
    AppJson(credentials): AppJson<Credentials>,
) -> Result<Json<AuthToken>, AppError> {
    Ok(Json(state.auth.login(&credentials).await?))
}
