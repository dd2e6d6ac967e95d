pub mod extract;
pub mod public;
pub mod requests;
pub mod trips;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(public::router())
        .merge(requests::router())
        .nest("/trips", trips::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        auth::{AuthService, AuthToken, Credentials, TokenBackend},
        config::AppConfig,
        error::AppError,
        models::{
            document::{Document, DocumentType},
            trip::{Stop, Trip, TripStatus},
        },
        services::{clock::FixedClock, trips::TripStore},
    };

    struct AcceptAll;

    #[async_trait]
    impl TokenBackend for AcceptAll {
        async fn generate_token(&self, _: &Credentials) -> Result<AuthToken, AppError> {
            Ok(AuthToken {
                token: "session-token".into(),
            })
        }
    }

    fn app() -> (Router, TripStore) {
        let mut active = Trip::new("1000077", TripStatus::Active)
            .with_stop(Stop::new(
                "Pilgrims Pride",
                "7515 Sheridan Dr, Willowbrook, IL 60527",
                "Jan 18, 2023, 16:00",
            ))
            .with_stop(Stop::new(
                "Pilgrims Pride",
                "7515 Sheridan Dr, Willowbrook, IL 60527",
                "Jan 18, 2023, 16:00",
            ));
        active.documents.push(Document {
            id: "1".into(),
            name: "206354 - 1".into(),
            kind: DocumentType::Bol,
            uploaded_on: None,
        });
        let store = TripStore::seeded(
            vec![
                active,
                Trip::new("1000078", TripStatus::Processing).with_stop(Stop::new(
                    "Distribution Center",
                    "123 Main St, Dallas, TX 75201",
                    "Jul 2, 2022, 08:00",
                )),
                Trip::new("1000070", TripStatus::Completed),
            ],
            Vec::new(),
        );
        let clock = FixedClock(
            NaiveDate::from_ymd_opt(2023, 1, 18)
                .and_then(|d| d.and_hms_opt(16, 23, 0))
                .unwrap(),
        );
        let state = AppState::new(
            AppConfig::default(),
            store.clone(),
            AuthService::new(Arc::new(AcceptAll)),
        )
        .with_clock(Arc::new(clock));
        (create_router(state), store)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = body.map_or_else(Body::empty, |value| Body::from(value.to_string()));
        send_body(app, method, uri, body).await
    }

    async fn send_body(app: &Router, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn trip_list_groups_by_status() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::GET, "/trips", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active"][0]["id"], "1000077");
        assert_eq!(body["active"][0]["origin"]["zone"], "CST");
        assert_eq!(body["processing"][0]["stops"], 1);
        assert_eq!(body["completed"].as_array().map(Vec::len), Some(1));

        let (status, body) = send(&app, Method::GET, "/trips?status=processing", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], "1000078");

        let (status, body) = send(&app, Method::GET, "/trips?status=lost", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["fields"]["status"].is_string());
    }

    #[tokio::test]
    async fn unknown_trip_is_404() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::GET, "/trips/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn check_in_draft_then_commit() {
        let (app, store) = app();
        let trip = store.get("1000077").await.unwrap();
        let stop_id = trip.stops[0].id;

        let (status, draft) = send(
            &app,
            Method::POST,
            &format!("/trips/1000077/stops/{stop_id}/checks/in/draft"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(draft["time"], "Jan 18, 2023, 16:23");
        assert_eq!(draft["zone"], "CST");

        let (status, detail) = send(
            &app,
            Method::PUT,
            &format!("/trips/1000077/stops/{stop_id}/checks/in"),
            Some(json!({ "time": draft["time"], "zone": draft["zone"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["stops"][0]["checkInAt"]["time"], "Jan 18, 2023, 16:23");
        assert_eq!(detail["stops"][0]["progress"], "checkedIn");
        assert!(detail["stops"][1]["checkInAt"].is_null());
        assert_eq!(detail["version"], 1);
    }

    #[tokio::test]
    async fn stop_detail_splits_address_and_fills_defaults() {
        let (app, store) = app();
        let stop_id = store.get("1000077").await.unwrap().stops[1].id;

        let (status, body) =
            send(&app, Method::GET, &format!("/trips/1000077/stops/{stop_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tripId"], "1000077");
        assert_eq!(body["number"], 2);
        assert_eq!(body["label"], "STOP 2 - Willowbrook, IL");
        assert_eq!(body["street"], "7515 Sheridan Dr");
        assert_eq!(body["locality"], "Willowbrook, IL");
        assert_eq!(body["zone"], "CST");
        assert_eq!(body["details"]["dropTrailer"], false);
        assert_eq!(body["details"]["handledBy"], "Company");
        assert_eq!(body["details"]["appointmentType"], "Appointment");

        let missing = store.get("1000078").await.unwrap().stops[0].id;
        let (status, body) =
            send(&app, Method::GET, &format!("/trips/1000077/stops/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "stop_not_found");
    }

    #[tokio::test]
    async fn confirm_load_marks_active_trip() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::POST, "/trips/1000077/confirm-load", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["confirmed"], true);
        assert_eq!(body["version"], 1);

        let (_, summary) = send(&app, Method::GET, "/trips?status=active", None).await;
        assert_eq!(summary[0]["confirmed"], true);

        let (status, body) = send(&app, Method::POST, "/trips/1000078/confirm-load", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "trip_not_active");
    }

    #[tokio::test]
    async fn malformed_requests_get_json_errors() {
        let (app, store) = app();
        let stop_id = store.get("1000077").await.unwrap().stops[0].id;

        let (status, body) =
            send(&app, Method::GET, "/trips/1000077/stops/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation");
        assert!(body["fields"]["path"].is_string());

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/trips/1000077/stops/{stop_id}/checks/sideways/draft"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["fields"]["path"].is_string());

        let (status, body) = send_body(
            &app,
            Method::PUT,
            &format!("/trips/1000077/stops/{stop_id}/checks/in"),
            Body::from("{ not json"),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation");
        assert!(body["fields"]["body"].is_string());
        assert_eq!(store.get("1000077").await.unwrap().version, 0);
    }

    #[tokio::test]
    async fn check_on_processing_trip_conflicts() {
        let (app, store) = app();
        let stop_id = store.get("1000078").await.unwrap().stops[0].id;
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/trips/1000078/stops/{stop_id}/checks/out"),
            Some(json!({ "time": "Jul 2, 2022, 10:45", "zone": "CST" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "trip_not_active");
    }

    #[tokio::test]
    async fn detention_flow() {
        let (app, store) = app();
        let stop_id = store.get("1000077").await.unwrap().stops[0].id;

        let (status, stops) = send(&app, Method::GET, "/trips/1000077/detention/stops", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stops[0]["label"], "STOP 1 - Willowbrook, IL");

        let (status, body) =
            send(&app, Method::POST, "/trips/1000077/detention", Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "selection_required");

        let (status, request) = send(
            &app,
            Method::POST,
            "/trips/1000077/detention",
            Some(json!({ "stopId": stop_id, "notes": "door 12", "documentIds": ["1"] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(request["requestNo"], "1001");
        assert_eq!(request["status"], "Open");
        assert_eq!(request["documents"][0]["name"], "206354 - 1");

        let (_, overview) = send(&app, Method::GET, "/detention", None).await;
        assert_eq!(overview[0]["tripId"], "1000077");
        assert!(overview[0]["amount"].is_null());
    }

    #[tokio::test]
    async fn attaching_documents() {
        let (app, _) = app();
        let (status, doc) = send(
            &app,
            Method::POST,
            "/trips/1000077/documents",
            Some(json!({ "type": "POD" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(doc["name"], "Document 2");
        assert_eq!(doc["uploadedOn"], "Jan 18 2023");

        let (_, docs) = send(&app, Method::GET, "/trips/1000077/documents", None).await;
        assert_eq!(docs.as_array().map(Vec::len), Some(2));

        let (status, _) = send(
            &app,
            Method::POST,
            "/trips/1000070/documents",
            Some(json!({ "type": "BOL" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn reimbursement_submission() {
        let (app, _) = app();
        let (status, created) = send(
            &app,
            Method::POST,
            "/reimbursements",
            Some(json!({
                "tripId": "1000077",
                "merchant": "Loves",
                "date": "01/18/2023",
                "amount": "76",
                "receiptAttached": true
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["amount"], "$76.00");
        assert_eq!(created["status"], "Open");

        let (status, body) = send(&app, Method::POST, "/reimbursements", Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["fields"]["merchant"].is_string());

        let (_, list) = send(&app, Method::GET, "/reimbursements", None).await;
        assert_eq!(list.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn login_validates_before_calling_backend() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({ "username": "ab", "password": "123" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["fields"]["username"], "Username must be at least 3 characters");
        assert_eq!(body["fields"]["password"], "Password must be at least 6 characters");

        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            Some(json!({ "username": "driver", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token"], "session-token");
    }

    #[tokio::test]
    async fn environment_reports_config() {
        let (app, _) = app();
        let (status, body) = send(&app, Method::GET, "/environment", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["env"], "local");
        assert_eq!(body["appName"], "UWMobile");
    }
}
