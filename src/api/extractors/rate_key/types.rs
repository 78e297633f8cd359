/*
 * Responsibility
 * - Handler から見える「このリクエストの rate limit key」の型
 * - middleware が算出して request extensions に格納し、handler はこの型だけを受け取る
 */

/// Identifier used to group requests for throttling.
///
/// Either the JWT `sub` from the `authorization` cookie or the peer IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateKey(pub String);
