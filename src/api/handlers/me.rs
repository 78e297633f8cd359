/*
 * Responsibility
 * - GET /me: middleware が決めた rate key をそのまま返す
 * - cookie に有効な JWT があれば sub、なければ接続元 IP
 */
use crate::api::extractors::RateKeyExtractor;

pub async fn me(RateKeyExtractor(key): RateKeyExtractor) -> String {
    key.0
}
