use crate::{
    AppState,
    auth::ADMIN_ROLE,
    handlers,
    middleware::{RoleGate, require_role},
};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{post, put},
};

/// Admin Router Module
///
/// Book mutations, gated on the Admin role claim. The gate is attached to the
/// method routers themselves, so it runs before the body is parsed but never
/// for a method the path does not serve (that stays a 405).
///
/// The paths overlap with the public GET routes; merging combines the method
/// routers while each keeps its own layers.
pub fn admin_routes(state: &AppState) -> Router<AppState> {
    let gate = RoleGate::new(ADMIN_ROLE, state.auth.clone());

    Router::new()
        // POST /api/Books
        // 201 + Location on success, 400 on invalid fields.
        .route(
            "/api/Books",
            post(handlers::create_book)
                .route_layer(from_fn_with_state(gate.clone(), require_role)),
        )
        // PUT/DELETE /api/Books/{id}
        // Replace in place (id preserved) or remove; 404 for unknown ids.
        .route(
            "/api/Books/{id}",
            put(handlers::update_book)
                .delete(handlers::delete_book)
                .route_layer(from_fn_with_state(gate, require_role)),
        )
}
