/*
 * Responsibility
 * - 環境変数 (.env) の読み込み (PORT, APP_ENV, SESSION_*, RATE_KEY_HEADER)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderName;

const DEFAULT_RATE_KEY_HEADER: &str = "x-rate-limit-key";

// browsers cap cookie Max-Age at 400 days
pub const MAX_SESSION_TTL_SECONDS: u64 = 400 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
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

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // HS256 secret for the demo login cookie
    pub session_jwt_secret: String,
    pub session_ttl_seconds: u64,

    // request header the resolved rate key is written to
    pub rate_key_header: HeaderName,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (`std::env` in production).
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let port: u16 = var("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let session_jwt_secret =
            var("SESSION_JWT_SECRET").ok_or(ConfigError::Missing("SESSION_JWT_SECRET"))?;
        if session_jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("SESSION_JWT_SECRET"));
        }

        let session_ttl_seconds = var("SESSION_TTL_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(3600); // 60 min
        if session_ttl_seconds == 0 || session_ttl_seconds > MAX_SESSION_TTL_SECONDS {
            return Err(ConfigError::Invalid("SESSION_TTL_SECONDS"));
        }

        let rate_key_header = var("RATE_KEY_HEADER")
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_RATE_KEY_HEADER.to_string());
        let rate_key_header = HeaderName::from_bytes(rate_key_header.as_bytes())
            .map_err(|_| ConfigError::Invalid("RATE_KEY_HEADER"))?;

        Ok(Self {
            addr,
            app_env,
            session_jwt_secret,
            session_ttl_seconds,
            rate_key_header,
        })
    }
}
