use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ParticipantId, SignupRequest};
use super::repository::{ParticipantRepository, RepositoryError};
use super::service::{ExchangeServiceError, GiftExchangeService};

/// Router builder exposing the exchange workflow over HTTP.
pub fn exchange_router<R>(service: Arc<GiftExchangeService<R>>) -> Router
where
    R: ParticipantRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/exchange/participants",
            post(signup_handler::<R>).get(roster_handler::<R>),
        )
        .route(
            "/api/v1/exchange/participants/:participant_id",
            delete(remove_handler::<R>),
        )
        .route(
            "/api/v1/exchange/participants/:participant_id/partner",
            put(partner_handler::<R>),
        )
        .route("/api/v1/exchange/draw", post(draw_handler::<R>))
        .route("/api/v1/exchange/draw/reset", post(reset_handler::<R>))
        .route("/api/v1/exchange/reveal", post(reveal_handler::<R>))
        .route("/api/v1/exchange/status", get(status_handler::<R>))
        .route(
            "/api/v1/exchange/settings",
            get(settings_view_handler::<R>).put(settings_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PartnerUpdateRequest {
    #[serde(default)]
    pub(crate) partner: Option<ParticipantId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RevealRequest {
    pub(crate) participant_id: ParticipantId,
    pub(crate) pin: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SettingsUpdateRequest {
    pub(crate) deadline: NaiveDate,
    pub(crate) budget: u32,
}

pub(crate) async fn signup_handler<R>(
    State(service): State<Arc<GiftExchangeService<R>>>,
    axum::Json(signup): axum::Json<SignupRequest>,
) -> Response
where
    R: ParticipantRepository + 'static,
{
    match service.register(signup) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.public_view())).into_response(),
        Err(ExchangeServiceError::Signup(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ExchangeServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "participant already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn roster_handler<R>(
    State(service): State<Arc<GiftExchangeService<R>>>,
) -> Response
where
    R: ParticipantRepository + 'static,
{
    match service.roster() {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn remove_handler<R>(
    State(service): State<Arc<GiftExchangeService<R>>>,
    Path(participant_id): Path<String>,
) -> Response
where
    R: ParticipantRepository + 'static,
{
    match service.remove_participant(&ParticipantId(participant_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(ExchangeServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "participant not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn partner_handler<R>(
    State(service): State<Arc<GiftExchangeService<R>>>,
    Path(participant_id): Path<String>,
    axum::Json(update): axum::Json<PartnerUpdateRequest>,
) -> Response
where
    R: ParticipantRepository + 'static,
{
    match service.set_partner(&ParticipantId(participant_id), update.partner) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(error @ ExchangeServiceError::DrawAlreadyComplete) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(ExchangeServiceError::Signup(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ExchangeServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "participant not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn draw_handler<R>(
    State(service): State<Arc<GiftExchangeService<R>>>,
) -> Response
where
    R: ParticipantRepository + 'static,
{
    match service.run_draw() {
        Ok(summary) => {
            let payload = json!({
                "success": true,
                "assigned": summary.assigned,
                "groups": summary.groups,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(ExchangeServiceError::Draw(error)) => {
            let payload = json!({ "success": false, "reason": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "success": false, "reason": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn reset_handler<R>(
    State(service): State<Arc<GiftExchangeService<R>>>,
) -> Response
where
    R: ParticipantRepository + 'static,
{
    match service.reset_draw() {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(other) => {
            let payload = json!({ "success": false, "reason": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn reveal_handler<R>(
    State(service): State<Arc<GiftExchangeService<R>>>,
    axum::Json(request): axum::Json<RevealRequest>,
) -> Response
where
    R: ParticipantRepository + 'static,
{
    match service.reveal(&request.participant_id, &request.pin) {
        Ok(target) => (StatusCode::OK, axum::Json(json!({ "target": target }))).into_response(),
        Err(error @ ExchangeServiceError::VerificationFailed) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<GiftExchangeService<R>>>,
) -> Response
where
    R: ParticipantRepository + 'static,
{
    match service.status() {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn settings_view_handler<R>(
    State(service): State<Arc<GiftExchangeService<R>>>,
) -> Response
where
    R: ParticipantRepository + 'static,
{
    match service.settings() {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn settings_handler<R>(
    State(service): State<Arc<GiftExchangeService<R>>>,
    axum::Json(update): axum::Json<SettingsUpdateRequest>,
) -> Response
where
    R: ParticipantRepository + 'static,
{
    match service.update_settings(update.deadline, update.budget) {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
