//! Router Module Index
//!
//! Routes are split by the guard they sit behind. Each guarded module attaches
//! its guard to its own method routers, so a route cannot end up in a module
//! without the matching check.

use axum::{
    extract::Request,
    http::{Uri, uri::PathAndQuery},
};

/// Routes open to anonymous callers.
pub mod public;

/// Routes that need any verified principal.
pub mod authenticated;

/// Book writes, gated on the Admin role claim.
pub mod admin;

/// Literal path segments of the route table, in their registered casing.
const LITERAL_SEGMENTS: [&str; 8] = [
    "api",
    "Account",
    "Books",
    "debug-claims",
    "health",
    "login",
    "profile",
    "register",
];

/// canonical_path
///
/// Route matching ignores case: every path segment that equals a route literal
/// up to ASCII case is rewritten to the registered casing before routing, so
/// `/api/books/1` reaches `/api/Books/{id}`. Other segments (ids) and the
/// query string are left as they are.
pub async fn canonical_path(mut request: Request) -> Request {
    let path = request.uri().path();
    let canonical = path
        .split('/')
        .map(|segment| {
            LITERAL_SEGMENTS
                .iter()
                .find(|literal| literal.eq_ignore_ascii_case(segment))
                .copied()
                .unwrap_or(segment)
        })
        .collect::<Vec<_>>()
        .join("/");

    if canonical == path {
        return request;
    }

    let path_and_query = match request.uri().query() {
        Some(query) => format!("{canonical}?{query}"),
        None => canonical,
    };

    let mut parts = request.uri().clone().into_parts();
    match path_and_query.parse::<PathAndQuery>() {
        Ok(rewritten) => {
            parts.path_and_query = Some(rewritten);
            match Uri::from_parts(parts) {
                Ok(uri) => *request.uri_mut() = uri,
                Err(e) => tracing::debug!(error = %e, "left request path as sent"),
            }
        }
        Err(e) => tracing::debug!(error = %e, "left request path as sent"),
    }

    request
}
