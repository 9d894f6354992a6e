//! Factory: build the token verifier from application `Config`.
use std::sync::Arc;

use crate::config::{Config, JwtKeyConfig};
use crate::services::auth::{JwtKey, JwtVerifier, TokenVerifier, jwt::JwtKeyError};

/// Key problems are returned as-is so startup can report the actual cause.
pub fn build_verifier(config: &Config) -> Result<Arc<dyn TokenVerifier>, JwtKeyError> {
    let key = match &config.jwt_key {
        JwtKeyConfig::Hs256 { secret } => JwtKey::Hs256 {
            secret: secret.as_bytes(),
        },
        JwtKeyConfig::EdDsa { public_key_pem } => JwtKey::EdDsa {
            public_key_pem: public_key_pem.as_str(),
        },
    };

    let verifier = JwtVerifier::new(
        key,
        config.jwt_issuer.as_deref(),
        config.jwt_audience.as_deref(),
        config.jwt_leeway_seconds,
    )?;

    tracing::debug!(?verifier, "token verifier ready");

    Ok(Arc::new(verifier))
}
