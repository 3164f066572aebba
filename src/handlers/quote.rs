use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::distance::RouteDistance;
use crate::error::{AppError, AppResult};
use crate::payment::PaymentHandoff;
use crate::pricing::{self, FareBreakdown, TripMode};
use crate::session::AddressField;
use crate::store::CalculationRecord;
use crate::utils::geo::Coordinate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub session_id: Uuid,
    pub start_address: String,
    pub end_address: String,
    #[serde(default)]
    pub mode: TripMode,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote_id: Uuid,
    pub distance: RouteDistance,
    pub fare: FareBreakdown,
    pub payment: PaymentHandoff,
}

/// Run the full pipeline: resolve both addresses, estimate the road
/// distance, price the trip and prepare the payment hand-off.
pub async fn create_quote(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<QuoteResponse>> {
    let (start_address, end_address) =
        validated_addresses(&payload.start_address, &payload.end_address)?;

    let discounted = state
        .sessions
        .discount_enabled(payload.session_id)
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    let start = resolve_coordinate(&state, payload.session_id, AddressField::Start, &start_address)
        .await?;
    let end =
        resolve_coordinate(&state, payload.session_id, AddressField::End, &end_address).await?;

    let distance = state.estimator.estimate(start, end).await;
    let fare = pricing::quote(state.config.pricing_policy, distance.km, payload.mode, discounted);

    tracing::info!(
        session_id = %payload.session_id,
        distance_km = distance.km,
        provenance = ?distance.provenance,
        final_total = fare.final_total,
        "quote calculated"
    );

    let quote_id = Uuid::new_v4();
    let payment = PaymentHandoff::new(
        quote_id,
        fare.final_total,
        &start_address,
        &end_address,
        Some(start),
        Some(end),
        state.config.checkout_url.clone(),
    );

    let record = CalculationRecord {
        from: start_address,
        to: end_address,
        coordinates: payment.coordinates.clone(),
        distance_km: fare.distance_km,
        provenance: distance.provenance,
        ride_price: fare.base_fare,
        processing_fee: fare.processing_fee,
        final_amount: fare.final_total,
        map_link: payment.map_link.clone(),
        timestamp: Utc::now(),
    };
    if let Err(err) = state.store.record_calculation(quote_id, &record) {
        // The audit trail is best-effort and never blocks a quote
        tracing::warn!("failed to record calculation: {}", err);
    }

    Ok(Json(QuoteResponse {
        quote_id,
        distance,
        fare,
        payment,
    }))
}

/// A pinned coordinate from an earlier suggestion wins; otherwise the
/// raw address is geocoded and the result cached on the session. Any
/// miss or upstream failure surfaces as the same friendly not-found
/// message; there is no gazetteer fallback on this path.
async fn resolve_coordinate(
    state: &AppState,
    session_id: Uuid,
    field: AddressField,
    address: &str,
) -> AppResult<Coordinate> {
    if let Some(Some(coordinate)) = state.sessions.pinned(session_id, field) {
        return Ok(coordinate);
    }

    let resolved = match state.geocoder.resolve(address).await {
        Ok(Some(coordinate)) => coordinate,
        Ok(None) => return Err(coordinates_not_found()),
        Err(err) => {
            tracing::warn!(field = ?field, "geocoding failed: {}", err);
            return Err(coordinates_not_found());
        }
    };

    let _ = state.sessions.pin_coordinate(session_id, field, resolved);
    Ok(resolved)
}

fn coordinates_not_found() -> AppError {
    AppError::NotFound("Could not find coordinates for one or both addresses.".to_string())
}

/// Both addresses trimmed, or the friendly validation error. Runs
/// before anything goes on the network.
fn validated_addresses(start: &str, end: &str) -> Result<(String, String), AppError> {
    let start = start.trim();
    let end = end.trim();

    if start.is_empty() || end.is_empty() {
        return Err(AppError::BadRequest(
            "Please enter both starting address and destination.".to_string(),
        ));
    }

    Ok((start.to_string(), end.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_addresses_are_rejected_before_any_lookup() {
        let err = validated_addresses("Praha", "   ").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(
            err.to_string(),
            "Please enter both starting address and destination."
        );

        assert!(validated_addresses("", "Brno").is_err());
        assert!(validated_addresses("\t", " ").is_err());
    }

    #[test]
    fn test_addresses_are_trimmed() {
        let (start, end) = validated_addresses("  Praha ", " Brno").unwrap();
        assert_eq!(start, "Praha");
        assert_eq!(end, "Brno");
    }
}
