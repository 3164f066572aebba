use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clients::nominatim::{suggestions_or_fallback, validated_query, Suggestion};
use crate::error::{AppError, AppResult};
use crate::session::AddressField;
use crate::utils::geo::Coordinate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    pub session_id: Uuid,
    pub field: AddressField,
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<Suggestion>,
    pub generation: u64,
    /// Set when a newer lookup for the same field superseded this one;
    /// the caller must discard the response
    pub stale: bool,
}

/// Autocomplete lookup for an address field. The client debounces
/// keystrokes; this side enforces the minimum query length and the
/// latest-request-wins ordering.
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> AppResult<Json<SuggestResponse>> {
    let generation = state
        .sessions
        .begin_suggestion(params.session_id, params.field)
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    // Editing the field drops any previously selected coordinate
    let _ = state.sessions.clear_pin(params.session_id, params.field);

    // Too-short queries short-circuit before any upstream call
    let Some(query) = validated_query(&params.q) else {
        return Ok(Json(SuggestResponse {
            suggestions: Vec::new(),
            generation,
            stale: false,
        }));
    };

    let primary = state.geocoder.suggest(query).await;
    let suggestions = suggestions_or_fallback(primary, query);

    if !state
        .sessions
        .is_current(params.session_id, params.field, generation)
    {
        tracing::debug!(
            session_id = %params.session_id,
            field = ?params.field,
            generation,
            "discarding stale suggestion response"
        );
        return Ok(Json(SuggestResponse {
            suggestions: Vec::new(),
            generation,
            stale: true,
        }));
    }

    Ok(Json(SuggestResponse {
        suggestions,
        generation,
        stale: false,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub session_id: Uuid,
    pub field: AddressField,
    pub lat: f64,
    pub lon: f64,
}

/// Pin the coordinate of a selected suggestion to its field so the
/// quote path can skip geocoding it again
pub async fn pin_suggestion(
    State(state): State<AppState>,
    Json(payload): Json<PinRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let coordinate = Coordinate {
        lat: payload.lat,
        lon: payload.lon,
    };

    state
        .sessions
        .pin_coordinate(payload.session_id, payload.field, coordinate)
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    Ok(Json(serde_json::json!({ "message": "Suggestion pinned" })))
}
