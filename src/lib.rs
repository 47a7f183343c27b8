use std::sync::Arc;

use axum::{Router, extract::FromRef, http::HeaderName, middleware::map_request};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod validation;

// Routing segregated by guard (Public, Authenticated, Admin).
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use auth::{AuthenticatorState, Principal, TokenIssuer};
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use repository::{BookRepository, InMemoryBookRepository, RepositoryState};

/// AppState
///
/// The single container of shared services handed to every request: the book
/// registry, the token issuer, the active authentication strategy and the
/// immutable configuration.
#[derive(Clone)]
pub struct AppState {
    /// Registry of book records.
    pub books: RepositoryState,
    /// Mints and verifies bearer tokens.
    pub tokens: TokenIssuer,
    /// Strategy resolving the request principal (JWT or test bypass).
    pub auth: AuthenticatorState,
    pub config: AppConfig,
}

impl AppState {
    /// Builds the production wiring for `config`: an empty in-memory registry
    /// and the authenticator matching `config.env`.
    pub fn from_config(config: AppConfig) -> Self {
        Self::with_repository(config, Arc::new(InMemoryBookRepository::new()))
    }

    /// Same as `from_config`, with a caller-supplied registry.
    pub fn with_repository(config: AppConfig, books: RepositoryState) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret);
        let auth = auth::authenticator_for(&config, &tokens);
        Self {
            books,
            tokens,
            auth,
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.books.clone()
    }
}

impl FromRef<AppState> for AuthenticatorState {
    fn from_ref(app_state: &AppState) -> AuthenticatorState {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for TokenIssuer {
    fn from_ref(app_state: &AppState) -> TokenIssuer {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, attaches the guards and the outer
/// observability/error layers, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let route_table = Router::new()
        // Public Routes: no guard.
        .merge(public::public_routes())
        // Authenticated Routes: any verified principal.
        .merge(authenticated::authenticated_routes(&state))
        // Admin Routes: role claim must equal "Admin".
        .merge(admin::admin_routes(&state))
        .with_state(state);

    // The route table sits behind a catch-all so the path can be canonicalized
    // before it is matched.
    Router::new()
        .fallback_service(route_table)
        .layer(
            ServiceBuilder::new()
                // Request ID Generation: a UUID for every request lacking one.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Request Tracing: one span per request, tagged with the id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Request ID Propagation: echo x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id))
                // Error boundary: a panic below this point becomes the generic 500.
                .layer(CatchPanicLayer::custom(error::handle_panic))
                // Case-insensitive routing: `/api/books` → `/api/Books`.
                .layer(map_request(routes::canonical_path)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: method, uri and the request id, so every log
/// line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
