//! Demo session tokens: HS256 JWT in the `authorization` cookie.
//!
//! `/login` で発行し、`/fetch` で署名 + exp を検証する。
//! rate key の抽出 (services::rate_key) はこの検証に依存しない。

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::AppError;
use crate::services::rate_key::AUTH_COOKIE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SessionIssuer")
            .field("validation", &self.validation)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl SessionIssuer {
    pub fn new(secret: &[u8], ttl_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Sign a session token for `sub`, valid for `ttl_seconds`.
    pub fn issue(&self, sub: &str) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let exp = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                error!(ttl_seconds = self.ttl_seconds, "session ttl out of range");
                AppError::Internal
            })?;
        let claims = SessionClaims {
            sub: sub.to_string(),
            iat: now,
            exp,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign session JWT");
            AppError::Internal
        })
    }

    /// Verify signature and `exp`.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        match jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => {
                warn!(error = ?err, "session token verification failed");
                Err(AppError::Unauthorized)
            }
        }
    }

    /// `Set-Cookie` value carrying the token.
    pub fn cookie(&self, token: &str) -> String {
        format!(
            "{AUTH_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
            self.ttl_seconds
        )
    }
}
