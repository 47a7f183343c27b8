use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a token: health, the account entry points and
/// read-only book access.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check for load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /api/Account/register
        // Demo registration; validates the payload, stores nothing.
        .route("/api/Account/register", post(handlers::register))
        // POST /api/Account/login
        // Exchanges the demo credentials for a bearer token.
        .route("/api/Account/login", post(handlers::login))
        // GET /api/Books
        .route("/api/Books", get(handlers::list_books))
        // GET /api/Books/{id}
        .route("/api/Books/{id}", get(handlers::get_book))
}
