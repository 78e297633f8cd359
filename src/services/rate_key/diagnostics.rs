/*
 * Responsibility
 * - ClaimExtractor の失敗メッセージの出力先 (nginx でいう r.error 相当)
 * - 本番は tracing に流す。テストでは記録用の実装を差し込む
 * - 出力の成否は戻り値に影響させない (fire-and-forget)
 */

/// Sink for human-readable diagnostics emitted on every extraction failure.
pub trait DiagnosticSink: Send + Sync {
    fn error(&self, message: &str);
}

/// Forwards diagnostics to the `tracing` error level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn error(&self, message: &str) {
        tracing::error!(target: "rate_key", "{message}");
    }
}
