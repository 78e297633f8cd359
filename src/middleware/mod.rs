/*
 * Responsibility
 * - middleware の公開インターフェース
 * - http: request id / trace / limit / timeout
 * - rate_key: cookie JWT → rate limit key
 */
pub mod http;
pub mod rate_key;
