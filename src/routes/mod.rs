use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{quote, session, suggest};
use crate::middleware::rate_limit::create_public_governor;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // All routes are public; the per-IP governor is the only gate
    let public_governor = create_public_governor();

    let api_routes = Router::new()
        .route("/session", post(session::create_session))
        .route("/session/{id}/discount", put(session::set_discount))
        .route("/session/{id}/language", put(session::set_language))
        .route("/suggest", get(suggest::suggest))
        .route("/suggest/pin", post(suggest::pin_suggestion))
        .route("/quote", post(quote::create_quote))
        .layer(public_governor);

    Router::new().nest("/api", api_routes).with_state(state)
}
