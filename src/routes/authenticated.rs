use crate::{AppState, handlers, middleware::require_authenticated};
use axum::{Router, middleware::from_fn_with_state, routing::get};

/// Authenticated Router Module
///
/// Endpoints for any verified principal, regardless of role.
pub fn authenticated_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // GET /api/Account/profile
        // Fixed demo profile.
        .route(
            "/api/Account/profile",
            get(handlers::profile)
                .route_layer(from_fn_with_state(state.clone(), require_authenticated)),
        )
        // GET /api/Account/debug-claims
        // Echoes the caller's claims; useful when a role check fails unexpectedly.
        .route(
            "/api/Account/debug-claims",
            get(handlers::debug_claims)
                .route_layer(from_fn_with_state(state.clone(), require_authenticated)),
        )
}
