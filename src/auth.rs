use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::{AppConfig, Env, TOKEN_AUDIENCE, TOKEN_ISSUER, TOKEN_TTL_SECS},
    error::ApiError,
    models::ClaimView,
};

/// The single demo account accepted by login.
pub const DEMO_EMAIL: &str = "admin@admin.de";
pub const DEMO_PASSWORD: &str = "password";

/// Role granted to the demo account and required by every book write.
pub const ADMIN_ROLE: &str = "Admin";

/// Claim type names as they appear in the token and in `debug-claims`.
pub const NAME_CLAIM: &str = "unique_name";
pub const ROLE_CLAIM: &str = "role";

/// Claims
///
/// Payload of a bearer token. `unique_name` carries the caller's email and
/// `role` the authorization role; the rest are the registered JWT claims
/// checked on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "unique_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iss: String,
    pub aud: String,
    /// Expiration Time (seconds since epoch).
    pub exp: i64,
    /// Issued At (seconds since epoch).
    pub iat: i64,
}

/// Principal
///
/// The verified identity of the current request. Built by an `Authenticator`
/// and cached in the request extensions, so the role gate and the handler
/// behind it share one authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub role: Option<String>,
    pub claims: Vec<ClaimView>,
}

impl Principal {
    pub fn new(name: impl Into<String>, role: Option<String>) -> Self {
        let name = name.into();
        let mut claims = vec![claim(NAME_CLAIM, &name)];
        if let Some(role) = &role {
            claims.push(claim(ROLE_CLAIM, role));
        }
        Self { name, role, claims }
    }

    fn from_claims(claims: Claims) -> Self {
        let mut principal = Principal::new(claims.name, claims.role);
        principal.claims.extend([
            claim("iss", &claims.iss),
            claim("aud", &claims.aud),
            claim("exp", &claims.exp.to_string()),
            claim("iat", &claims.iat.to_string()),
        ]);
        principal
    }

    /// Exact, case-sensitive role match. A missing role claim never matches.
    pub fn has_role(&self, required: &str) -> bool {
        self.role.as_deref() == Some(required)
    }

    /// authorize
    ///
    /// The claim-based role check. Fails with `Forbidden` when the role claim
    /// is absent or differs from `required`.
    pub fn authorize(&self, required: &str) -> Result<(), ApiError> {
        tracing::debug!(
            required_role = required,
            found_role = self.role.as_deref().unwrap_or("none"),
            principal = %self.name,
            "checking role claim"
        );

        if self.has_role(required) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "principal '{}' lacks role '{}'",
                self.name, required
            )))
        }
    }
}

fn claim(claim_type: &str, value: &str) -> ClaimView {
    ClaimView {
        claim_type: claim_type.to_string(),
        value: value.to_string(),
    }
}

/// AuthError
///
/// Why a request could not be authenticated. Every variant surfaces to the
/// client as a plain 401; the detail is only logged.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingCredentials,
    #[error("unsupported Authorization scheme")]
    UnsupportedScheme,
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::unauthenticated(err.to_string())
    }
}

// --- Token Issuer ---

/// TokenIssuer
///
/// Mints and verifies HS256 bearer tokens with the fixed issuer/audience and
/// a one-hour lifetime.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.validate_exp = true;

        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation: Arc::new(validation),
        }
    }

    /// login
    ///
    /// Checks the hardcoded credential pair and, on a match, issues an Admin
    /// token for it. Anything else is `Unauthenticated`.
    pub fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        if email != DEMO_EMAIL || password != DEMO_PASSWORD {
            tracing::warn!(email, "rejected login attempt");
            return Err(ApiError::unauthenticated("invalid credentials"));
        }

        self.issue(email, Some(ADMIN_ROLE))
    }

    /// Signs a token for `name` carrying `role`, valid for one hour from now.
    pub fn issue(&self, name: &str, role: Option<&str>) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            name: name.to_string(),
            role: role.map(str::to_string),
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp: now + TOKEN_TTL_SECS,
            iat: now,
        };

        self.sign(&claims)
    }

    /// Signs arbitrary claims with the issuer's key.
    pub fn sign(&self, claims: &Claims) -> Result<String, ApiError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("token signing failed: {e}")))
    }

    /// Verifies signature, expiry, issuer and audience.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(AuthError::Expired),
            Err(e) => Err(AuthError::InvalidToken(e)),
        }
    }
}

// --- Authentication Strategies ---

/// Authenticator
///
/// Strategy that turns request headers into a `Principal`. The concrete
/// implementation is chosen from `AppConfig::env` when the state is built.
pub trait Authenticator: Send + Sync {
    /// Scheme name, used in logs.
    fn scheme(&self) -> &'static str;

    fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError>;
}

/// AuthenticatorState
///
/// The shared handle to the active authentication strategy.
pub type AuthenticatorState = Arc<dyn Authenticator>;

/// Picks the strategy for the configured environment.
pub fn authenticator_for(config: &AppConfig, issuer: &TokenIssuer) -> AuthenticatorState {
    match config.env {
        Env::Test => Arc::new(TestAuthenticator),
        Env::Local | Env::Production => Arc::new(JwtAuthenticator::new(issuer.clone())),
    }
}

fn authorization_header(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingCredentials)
}

/// Splits `<scheme> <credentials>` and returns the credentials when the scheme
/// is one of `schemes`. Scheme names compare case-insensitively.
fn credentials_for<'a>(value: &'a str, schemes: &[&str]) -> Result<&'a str, AuthError> {
    let (scheme, credentials) = value
        .trim_start()
        .split_once(' ')
        .ok_or(AuthError::UnsupportedScheme)?;

    if schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
        Ok(credentials.trim())
    } else {
        Err(AuthError::UnsupportedScheme)
    }
}

/// JwtAuthenticator
///
/// Standard bearer scheme: `Authorization: Bearer <jwt>` (scheme in any
/// case), verified by the `TokenIssuer`.
pub struct JwtAuthenticator {
    issuer: TokenIssuer,
}

impl JwtAuthenticator {
    pub fn new(issuer: TokenIssuer) -> Self {
        Self { issuer }
    }
}

impl Authenticator for JwtAuthenticator {
    fn scheme(&self) -> &'static str {
        "Bearer"
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let token = credentials_for(authorization_header(headers)?, &["Bearer"])?;

        let claims = self.issuer.verify(token)?;
        Ok(Principal::from_claims(claims))
    }
}

/// TestAuthenticator
///
/// Test-environment bypass: any `Bearer` or `Test` Authorization header is
/// accepted without signature checks and yields an Admin principal.
pub struct TestAuthenticator;

/// Identity assigned by the test authenticator.
pub const TEST_PRINCIPAL_NAME: &str = "TestUser";

impl Authenticator for TestAuthenticator {
    fn scheme(&self) -> &'static str {
        "Test"
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        credentials_for(authorization_header(headers)?, &["Bearer", "Test"])?;
        Ok(Principal::new(
            TEST_PRINCIPAL_NAME,
            Some(ADMIN_ROLE.to_string()),
        ))
    }
}

/// Principal Extractor Implementation
///
/// Makes `Principal` usable as a handler or middleware argument. A principal
/// already established earlier in the request is reused; otherwise the active
/// `Authenticator` runs and the result is cached in the extensions.
///
/// Rejection: `ApiError::Unauthenticated` (401).
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
    AuthenticatorState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(principal.clone());
        }

        let authenticator = AuthenticatorState::from_ref(state);
        let principal = authenticator.authenticate(&parts.headers).map_err(|e| {
            tracing::debug!(scheme = authenticator.scheme(), reason = %e, "authentication failed");
            ApiError::from(e)
        })?;

        parts.extensions.insert(principal.clone());
        Ok(principal)
    }
}
