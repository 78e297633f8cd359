/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - extractor: rate key 抽出, sessions: デモ用 session JWT
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use axum::http::HeaderName;

use crate::services::{rate_key::ClaimExtractor, session::SessionIssuer};

#[derive(Clone, Debug)]
pub struct AppState {
    pub extractor: Arc<ClaimExtractor>,
    pub sessions: Arc<SessionIssuer>,
    pub rate_key_header: HeaderName,
}

impl AppState {
    pub fn new(
        extractor: Arc<ClaimExtractor>,
        sessions: Arc<SessionIssuer>,
        rate_key_header: HeaderName,
    ) -> Self {
        Self {
            extractor,
            sessions,
            rate_key_header,
        }
    }
}
