use std::env;

use thiserror::Error;

/// Issuer and audience stamped into (and required from) every bearer token.
pub const TOKEN_ISSUER: &str = "BookStoreApi";
pub const TOKEN_AUDIENCE: &str = "BookStoreApi";

/// Lifetime of a freshly issued bearer token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Signing key used whenever no `JWT_SECRET` is provided outside production.
pub const DEFAULT_JWT_SECRET: &str =
    "ein_sehr_langer_und_sicherer_geheimer_schluessel_fuer_jwt_123456789";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// AppConfig
///
/// Holds the service configuration. It is loaded once at startup and then only
/// cloned into handlers through `FromRef`, so every request sees the same values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the authentication strategy and log format.
    pub env: Env,
    // Socket address the HTTP listener binds to.
    pub bind_addr: String,
    // Symmetric HS256 key used to sign and verify bearer tokens.
    pub jwt_secret: String,
}

/// Env
///
/// Runtime context. `Test` swaps JWT verification for the header-only test
/// authenticator; `Production` demands an explicit signing secret.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Test,
    Production,
}

impl Env {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" => Env::Production,
            "test" => Env::Test,
            _ => Env::Local,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in production")]
    MissingSecret,
}

impl Default for AppConfig {
    /// Local configuration with the built-in demo secret, for test scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// Production is fail-fast: starting without `JWT_SECRET` would mean signing
    /// tokens with the public demo key, so it is reported as an error instead.
    pub fn load() -> Result<Self, ConfigError> {
        let env = env::var("APP_ENV")
            .map(|value| Env::parse(&value))
            .unwrap_or(Env::Local);

        let jwt_secret = match (env, env::var("JWT_SECRET")) {
            (_, Ok(secret)) if !secret.is_empty() => secret,
            (Env::Production, _) => return Err(ConfigError::MissingSecret),
            _ => DEFAULT_JWT_SECRET.to_string(),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            env,
            bind_addr,
            jwt_secret,
        })
    }

    /// Configuration for the `Test` environment, with the demo secret.
    pub fn for_tests() -> Self {
        Self {
            env: Env::Test,
            ..Self::default()
        }
    }
}
