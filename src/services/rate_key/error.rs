use thiserror::Error;

/// Why a `sub` could not be read from the authorization cookie.
///
/// `ClaimExtractor::get_user_id` swallows all of these and falls back to the
/// remote address; callers of `extract_sub` get them as-is.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no authorization cookie found")]
    MissingCookie,

    #[error("invalid JWT format: expected 3 segments, got {segments}")]
    MalformedToken { segments: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("no 'sub' claim found in JWT")]
    MissingClaim,
}

/// base64url と JSON の失敗は同じカテゴリとして扱う
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64url payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}
