// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use vigil_scheduler::{Event, EventSender};

/// `POST /api/bot` request body: one inbound chat message to enqueue as a
/// `HumanInputEvent`.
#[derive(Debug, Deserialize)]
pub struct BotRequest {
    pub session_id: String,
    pub message_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: &'static str,
}

#[derive(Clone)]
struct GatewayState {
    events: EventSender,
}

/// Builds the minimal HTTP ingress: `POST /api/bot` enqueues a
/// `HumanInputEvent` onto the scheduler's queue, `GET /api/health` reports
/// liveness. Nothing else is exposed — the P2P/TLS/Slack surface the
/// corpus's own gateway carries has no counterpart here.
pub fn router(events: EventSender) -> Router {
    Router::new()
        .route("/api/bot", post(post_bot))
        .route("/api/health", get(get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(GatewayState { events })
}

async fn post_bot(
    State(state): State<GatewayState>,
    payload: Result<Json<BotRequest>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(e) => {
            warn!(error = %e, "rejected malformed /api/bot body");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({"status": "error", "message": e.to_string()})),
            )
                .into_response();
        }
    };

    info!(chat_id = %body.session_id, message_id = %body.message_id, "enqueuing human input event");
    if state
        .events
        .send(Event::HumanInput {
            chat_id: body.session_id,
            message_id: body.message_id,
            message: body.message,
        })
        .is_err()
    {
        warn!("event queue closed; scheduler is no longer running");
    }

    (StatusCode::OK, Json(StatusBody { status: "queued" })).into_response()
}

async fn get_health() -> Response {
    (StatusCode::OK, Json(StatusBody { status: "ok" })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    fn test_router() -> (Router, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (router(tx), rx)
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let (app, _rx) = test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn bot_endpoint_enqueues_human_input_event() {
        let (app, mut rx) = test_router();
        let body = serde_json::json!({
            "session_id": "c1",
            "message_id": "m1",
            "message": "hello"
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/bot")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let event = rx.try_recv().unwrap();
        match event {
            Event::HumanInput {
                chat_id,
                message_id,
                message,
            } => {
                assert_eq!(chat_id, "c1");
                assert_eq!(message_id, "m1");
                assert_eq!(message, "hello");
            }
            other => panic!("expected HumanInput event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bot_endpoint_rejects_malformed_body_with_422() {
        let (app, _rx) = test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/bot")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn bot_endpoint_rejects_missing_fields_with_422() {
        let (app, _rx) = test_router();
        let body = serde_json::json!({"session_id": "c1"});
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/bot")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
