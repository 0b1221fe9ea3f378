use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use helpdesk_api::auth::{self, AppState};
use helpdesk_api::middleware::require_auth;
use helpdesk_api::tickets;

/// Assemble the full route tree. Split out of main so integration tests can
/// drive the router directly.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/tickets", post(tickets::submit_ticket))
        .route("/tickets", get(tickets::list_tickets))
        .route("/tickets/{ticket_id}/close", post(tickets::close_ticket))
        .layer(middleware::from_fn(require_auth))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
