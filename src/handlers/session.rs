use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::pricing::PricingPolicy;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub language: String,
    pub discount_enabled: bool,
    pub pricing_policy: PricingPolicy,
}

/// Start a calculation session. The language is seeded from the
/// persisted preference.
pub async fn create_session(State(state): State<AppState>) -> AppResult<Json<SessionResponse>> {
    let language = state
        .store
        .language()
        .unwrap_or_else(|| "en".to_string());
    let session_id = state.sessions.create(language.clone());

    Ok(Json(SessionResponse {
        session_id,
        language,
        discount_enabled: false,
        pricing_policy: state.config.pricing_policy,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DiscountRequest {
    pub enabled: bool,
}

/// Toggle discounted pricing. Enabling is gated by a deployment
/// feature flag; disabling always succeeds. There is deliberately no
/// PIN or passphrase here: a client-side check would not be a security
/// control.
pub async fn set_discount(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<DiscountRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if payload.enabled && !state.config.discount_toggle_enabled {
        return Err(AppError::Forbidden(
            "Discounted pricing is not available.".to_string(),
        ));
    }

    state
        .sessions
        .set_discount(session_id, payload.enabled)
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    tracing::info!(%session_id, enabled = payload.enabled, "discount mode toggled");

    Ok(Json(serde_json::json!({ "discount_enabled": payload.enabled })))
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: String,
}

/// Change the session language and persist it as the default for
/// future sessions
pub async fn set_language(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<LanguageRequest>,
) -> AppResult<Json<serde_json::Value>> {
    state
        .sessions
        .set_language(session_id, &payload.language)
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    if let Err(err) = state.store.set_language(&payload.language) {
        tracing::warn!("failed to persist language preference: {}", err);
    }

    Ok(Json(serde_json::json!({ "language": payload.language })))
}
