/*
 * Responsibility
 * - ドメインロジック (HTTP に依存しない部分)
 * - rate_key: cookie JWT → rate limit key
 * - session: デモ用の session JWT 発行・検証
 */
pub mod rate_key;
pub mod session;
