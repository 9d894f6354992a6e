/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可, JWT 検証設定, whiteboard 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// How access tokens are signed by the issuer.
#[derive(Clone, PartialEq, Eq)]
pub enum JwtKeyConfig {
    Hs256 { secret: String },
    EdDsa { public_key_pem: String },
}

impl fmt::Debug for JwtKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            Self::Hs256 { .. } => f.write_str("Hs256"),
            Self::EdDsa { .. } => f.write_str("EdDsa"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub jwt_key: JwtKeyConfig,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub jwt_leeway_seconds: u64,

    pub board_channel_capacity: usize,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary lookup (process env in production, a map in tests).
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwt_key = match var("JWT_ALGORITHM")
            .unwrap_or_else(|| "HS256".to_string())
            .to_ascii_uppercase()
            .as_str()
        {
            "HS256" => {
                let secret =
                    non_empty(var("JWT_SECRET")).ok_or(ConfigError::Missing("JWT_SECRET"))?;
                JwtKeyConfig::Hs256 { secret }
            }
            "EDDSA" => {
                let public_key_pem = non_empty(var("JWT_PUBLIC_KEY_PEM"))
                    .ok_or(ConfigError::Missing("JWT_PUBLIC_KEY_PEM"))?
                    .replace("\\n", "\n");
                JwtKeyConfig::EdDsa { public_key_pem }
            }
            _ => return Err(ConfigError::Invalid("JWT_ALGORITHM")),
        };

        let jwt_issuer = non_empty(var("JWT_ISSUER"));
        let jwt_audience = non_empty(var("JWT_AUDIENCE"));

        let jwt_leeway_seconds = var("JWT_LEEWAY_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let board_channel_capacity = match var("BOARD_CHANNEL_CAPACITY") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::Invalid("BOARD_CHANNEL_CAPACITY")),
            },
            None => 256,
        };

        let request_timeout_seconds = var("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(30);

        let request_body_limit_bytes = var("REQUEST_BODY_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            jwt_key,
            jwt_issuer,
            jwt_audience,
            jwt_leeway_seconds,
            board_channel_capacity,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_only_a_secret() {
        let config = load(&[("JWT_SECRET", "s3cret")]).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(
            config.jwt_key,
            JwtKeyConfig::Hs256 {
                secret: "s3cret".into()
            }
        );
        assert_eq!(config.jwt_issuer, None);
        assert_eq!(config.jwt_leeway_seconds, 60);
        assert_eq!(config.board_channel_capacity, 256);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.request_body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn secret_is_required_for_hs256() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("JWT_SECRET"));
        assert_eq!(
            load(&[("JWT_SECRET", "   ")]).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn eddsa_expands_escaped_newlines() {
        let config = load(&[
            ("JWT_ALGORITHM", "EdDSA"),
            (
                "JWT_PUBLIC_KEY_PEM",
                "-----BEGIN PUBLIC KEY-----\\nabc\\n-----END PUBLIC KEY-----",
            ),
        ])
        .unwrap();

        assert_eq!(
            config.jwt_key,
            JwtKeyConfig::EdDsa {
                public_key_pem: "-----BEGIN PUBLIC KEY-----\nabc\n-----END PUBLIC KEY-----".into()
            }
        );
    }

    #[test]
    fn unknown_algorithm_is_invalid() {
        let err = load(&[("JWT_ALGORITHM", "RS256"), ("JWT_SECRET", "x")]).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("JWT_ALGORITHM"));
    }

    #[test]
    fn production_mode_and_origins() {
        let config = load(&[
            ("JWT_SECRET", "x"),
            ("APP_ENV", "PROD"),
            ("PORT", "8080"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ])
        .unwrap();

        assert!(config.app_env.is_production());
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn rejects_bad_port_and_zero_capacity() {
        assert_eq!(
            load(&[("JWT_SECRET", "x"), ("PORT", "http")]).unwrap_err(),
            ConfigError::Invalid("PORT")
        );
        assert_eq!(
            load(&[("JWT_SECRET", "x"), ("BOARD_CHANNEL_CAPACITY", "0")]).unwrap_err(),
            ConfigError::Invalid("BOARD_CHANNEL_CAPACITY")
        );
    }

    #[test]
    fn errors_name_the_offending_variable() {
        assert_eq!(
            load(&[]).unwrap_err().to_string(),
            "missing configuration: JWT_SECRET"
        );
        assert_eq!(
            ConfigError::Invalid("PORT").to_string(),
            "invalid configuration: PORT"
        );
    }
}
