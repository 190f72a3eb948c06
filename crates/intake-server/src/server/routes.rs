//! HTTP surface of the intake service.
//!
//! Thin axum handlers over the [`IntakeService`] pipeline. The `/apply`
//! routes sit behind admission control; `/health` does not. Handlers return
//! the unified [`Error`] directly, which carries its own response mapping.

use crate::server::limit::{self, RateLimiter};
use crate::server::pipeline::IntakeService;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use chrono::Utc;
use intake_core::{Error, FieldError};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared per-request state: the pipeline and the admission controller.
#[derive(Clone)]
pub struct AppState {
    pub service: IntakeService,
    pub limiter: Arc<RateLimiter>,
}

/// Builds the service router.
pub fn app(state: AppState) -> Router {
    let intake = Router::new()
        .route("/apply", post(submit).delete(withdraw))
        .route_layer(middleware::from_fn_with_state(state.clone(), limit::admission));

    Router::new()
        .merge(intake)
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// POST /apply
async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let Json(payload) = payload.map_err(|rejection| Error::InvalidRequest {
        details: vec![FieldError::new("body", rejection.body_text())],
    })?;

    let outcome = state.service.submit(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Application submitted successfully",
            "applicationId": outcome.application_id,
            "email_sent": outcome.email_sent,
        })),
    ))
}

#[derive(serde::Deserialize)]
struct WithdrawQuery {
    #[serde(rename = "applicationId")]
    application_id: Option<String>,
}

/// DELETE /apply?applicationId=app_...
async fn withdraw(
    State(state): State<AppState>,
    Query(query): Query<WithdrawQuery>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let external_id = query.application_id.ok_or(Error::InvalidApplicationId {
        reason: "missing applicationId query parameter".to_string(),
    })?;

    let outcome = state.service.withdraw(&external_id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Application deleted successfully",
            "applicationId": outcome.application_id,
            "email_sent": outcome.email_sent,
        })),
    ))
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.service.config().environment,
        "emailEnabled": state.service.email_enabled(),
    }))
}
