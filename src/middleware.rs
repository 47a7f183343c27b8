use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    auth::{AuthenticatorState, Principal},
    error::ApiError,
};

/// require_authenticated
///
/// Guards the routes that accept any verified caller. Extracting `Principal`
/// runs the active `Authenticator`; if that fails the extractor rejects with
/// 401 before the handler is reached.
pub async fn require_authenticated(
    _principal: Principal,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}

/// RoleGate
///
/// Middleware state binding a required role to the authenticator, fixed when
/// the route is registered.
#[derive(Clone)]
pub struct RoleGate {
    pub required: &'static str,
    pub authenticator: AuthenticatorState,
}

impl RoleGate {
    pub fn new(required: &'static str, authenticator: AuthenticatorState) -> Self {
        Self {
            required,
            authenticator,
        }
    }
}

impl FromRef<RoleGate> for AuthenticatorState {
    fn from_ref(gate: &RoleGate) -> AuthenticatorState {
        gate.authenticator.clone()
    }
}

/// require_role
///
/// The claim-based authorizer. Runs before body extraction and the handler:
/// no principal → 401, principal without the gate's role → 403, otherwise the
/// request passes through untouched.
pub async fn require_role(
    State(gate): State<RoleGate>,
    principal: Principal,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    principal.authorize(gate.required)?;
    Ok(next.run(request).await)
}
