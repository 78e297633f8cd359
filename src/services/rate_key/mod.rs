//! Rate limit key from the `authorization` cookie.
//!
//! - claim_extractor: cookie → JWT payload → `sub` (fallback: remote address)
//! - base64url: segment decoding
//! - diagnostics: where failure messages go
//! - error: ExtractError / DecodeError
pub mod base64url;
pub mod claim_extractor;
pub mod diagnostics;
pub mod error;

pub use claim_extractor::{AUTH_COOKIE, ClaimExtractor, find_cookie};
