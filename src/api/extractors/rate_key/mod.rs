//! Per-request rate limit key as seen by handlers.
//!
//! `middleware::rate_key` が RateKey を extensions に入れ、
//! handler は RateKeyExtractor で受け取る (cookie や IP を自分で読まない)。

mod core;
mod types;

pub use self::core::RateKeyExtractor;
pub use self::types::RateKey;
