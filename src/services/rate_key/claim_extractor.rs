//! `authorization` cookie (JWT) → `sub` → rate limit key
//!
//! 署名検証はしない。payload を信頼して `sub` を取り出すだけ。
//! rate limit のキーとして使うので、取れなければ remote address に落とす。

use std::sync::Arc;

use serde_json::{Map, Value};

use super::base64url;
use super::diagnostics::{DiagnosticSink, TracingSink};
use super::error::{DecodeError, ExtractError};

/// Name of the cookie carrying the JWT.
pub const AUTH_COOKIE: &str = "authorization";

const SUBJECT_CLAIM: &str = "sub";

/// Stateless extractor; cheap to clone and safe to share across requests.
#[derive(Clone)]
pub struct ClaimExtractor {
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for ClaimExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimExtractor").finish_non_exhaustive()
    }
}

impl Default for ClaimExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimExtractor {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    pub fn with_sink(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// Read the `sub` claim from the JWT in the `authorization` cookie.
    ///
    /// Every failure is reported to the diagnostic sink before it is returned.
    pub fn extract_sub(&self, cookie_header: &str) -> Result<String, ExtractError> {
        let result = extract(cookie_header);

        if let Err(err) = &result {
            self.sink.error(&diagnostic(err));
        }

        result
    }

    /// `sub` if present, otherwise `remote_address` verbatim. Never fails.
    pub fn get_user_id(&self, cookie_header: &str, remote_address: &str) -> String {
        self.extract_sub(cookie_header)
            .unwrap_or_else(|_| remote_address.to_string())
    }
}

fn extract(cookie_header: &str) -> Result<String, ExtractError> {
    let token = find_cookie(cookie_header, AUTH_COOKIE).ok_or(ExtractError::MissingCookie)?;

    // header.payload.signature
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(ExtractError::MalformedToken {
            segments: segments.len(),
        });
    };

    let bytes = base64url::decode(payload).map_err(DecodeError::from)?;
    let mut claims: Map<String, Value> =
        serde_json::from_slice(&bytes).map_err(DecodeError::from)?;

    match claims.remove(SUBJECT_CLAIM) {
        Some(Value::String(sub)) if !sub.is_empty() => Ok(sub),
        _ => Err(ExtractError::MissingClaim),
    }
}

/// Value of the first non-empty cookie named exactly `name`.
///
/// Values are returned as sent (no percent-decoding); surrounding whitespace is dropped.
pub fn find_cookie<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim_start().split_once('='))
        .filter(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .find(|value| !value.is_empty())
}

fn diagnostic(err: &ExtractError) -> String {
    match err {
        ExtractError::MissingCookie => "No authorization cookie found".to_string(),
        ExtractError::MalformedToken { .. } => "Invalid JWT format".to_string(),
        ExtractError::Decode(e) => format!("Error extracting sub from JWT: {e}"),
        ExtractError::MissingClaim => "No 'sub' claim found in JWT".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use std::sync::Mutex;

    const HEADER: &str = "eyJhbGciOiJIUzI1NiJ9";

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<String>>);

    impl RecordingSink {
        fn messages(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl DiagnosticSink for RecordingSink {
        fn error(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    fn recording() -> (ClaimExtractor, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (ClaimExtractor::with_sink(sink.clone()), sink)
    }

    fn cookie_for(payload: &str) -> String {
        format!(
            "authorization={HEADER}.{}.sig",
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn extracts_sub_from_known_token() {
        let (extractor, sink) = recording();
        let header = "authorization=eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ1c2VyMTIzIn0.sig";

        assert_eq!(extractor.extract_sub(header).unwrap(), "user123");
        assert_eq!(extractor.get_user_id(header, "203.0.113.5"), "user123");
        assert_eq!(extractor.get_user_id(header, ""), "user123");
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn extracts_sub_among_other_cookies() {
        let (extractor, _) = recording();
        let header = format!(
            "theme=dark; {}; lang=en",
            cookie_for(r#"{"sub":"42","exp":1}"#)
        );

        assert_eq!(extractor.extract_sub(&header).unwrap(), "42");
    }

    #[test]
    fn returns_sub_exactly_as_encoded() {
        let (extractor, _) = recording();
        for id in ["a", "user 1", "7f1c2a9e-0000-4000-8000-000000000001", "ユーザー"] {
            let payload = serde_json::json!({ "sub": id }).to_string();
            assert_eq!(extractor.extract_sub(&cookie_for(&payload)).unwrap(), id);
        }
    }

    #[test]
    fn decodes_multibyte_utf8_sub() {
        let (extractor, _) = recording();
        let header = cookie_for(r#"{"sub":"josé-東京"}"#);

        assert_eq!(extractor.extract_sub(&header).unwrap(), "josé-東京");
    }

    #[test]
    fn missing_cookie_falls_back_to_remote_address() {
        let (extractor, sink) = recording();

        assert_eq!(extractor.get_user_id("", "203.0.113.5"), "203.0.113.5");
        assert_eq!(extractor.get_user_id("session=abc; theme=dark", "10.0.0.1"), "10.0.0.1");
        assert_eq!(extractor.get_user_id("", ""), "");
        assert_eq!(sink.messages(), vec!["No authorization cookie found"; 3]);
    }

    #[test]
    fn empty_cookie_value_is_missing() {
        let (extractor, _) = recording();

        assert!(matches!(
            extractor.extract_sub("authorization=; other=1"),
            Err(ExtractError::MissingCookie)
        ));
        assert!(matches!(
            extractor.extract_sub("authorization="),
            Err(ExtractError::MissingCookie)
        ));
    }

    #[test]
    fn cookie_name_must_match_exactly() {
        let (extractor, _) = recording();
        let token = cookie_for(r#"{"sub":"x"}"#);

        assert!(matches!(
            extractor.extract_sub(&format!("my{token}")),
            Err(ExtractError::MissingCookie)
        ));
        assert!(matches!(
            extractor.extract_sub(&token.replace("authorization", "Authorization")),
            Err(ExtractError::MissingCookie)
        ));
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        let (extractor, sink) = recording();

        for (token, expected) in [
            ("abc", 1),
            ("a.b", 2),
            ("a.b.c.d", 4),
            ("not.a.valid.jwt.with5parts", 5),
        ] {
            let header = format!("authorization={token}");
            match extractor.extract_sub(&header) {
                Err(ExtractError::MalformedToken { segments }) => assert_eq!(segments, expected),
                other => panic!("expected MalformedToken for {token}, got {other:?}"),
            }
            assert_eq!(extractor.get_user_id(&header, "198.51.100.7"), "198.51.100.7");
        }

        assert!(sink.messages().iter().all(|m| m == "Invalid JWT format"));
    }

    #[test]
    fn bad_base64_is_decode_error() {
        let (extractor, sink) = recording();

        let err = extractor
            .extract_sub("authorization=aaa.!!!.ccc")
            .unwrap_err();
        assert!(matches!(err, ExtractError::Decode(DecodeError::Base64(_))));

        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Error extracting sub from JWT: "));
    }

    #[test]
    fn non_object_json_is_decode_error() {
        let (extractor, _) = recording();

        for payload in ["not json", "[1,2]", r#""sub""#, ""] {
            let err = extractor.extract_sub(&cookie_for(payload)).unwrap_err();
            assert!(
                matches!(err, ExtractError::Decode(DecodeError::Json(_))),
                "payload {payload:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn invalid_utf8_is_decode_error() {
        let (extractor, _) = recording();
        let header = format!(
            "authorization={HEADER}.{}.sig",
            URL_SAFE_NO_PAD.encode([b'{', 0xff, b'}'])
        );

        assert!(matches!(
            extractor.extract_sub(&header),
            Err(ExtractError::Decode(DecodeError::Json(_)))
        ));
    }

    #[test]
    fn unusable_sub_is_missing_claim() {
        let (extractor, sink) = recording();

        for payload in [
            r#"{}"#,
            r#"{"sub":""}"#,
            r#"{"sub":null}"#,
            r#"{"sub":123}"#,
            r#"{"sub":["a"]}"#,
            r#"{"user":"a"}"#,
        ] {
            assert!(
                matches!(
                    extractor.extract_sub(&cookie_for(payload)),
                    Err(ExtractError::MissingClaim)
                ),
                "payload {payload}"
            );
        }

        assert_eq!(sink.messages(), vec!["No 'sub' claim found in JWT"; 6]);
    }

    #[test]
    fn get_user_id_is_idempotent() {
        let (extractor, _) = recording();
        let with_token = cookie_for(r#"{"sub":"same"}"#);

        for header in [with_token.as_str(), "", "authorization=a.b"] {
            let first = extractor.get_user_id(header, "192.0.2.1");
            let second = extractor.get_user_id(header, "192.0.2.1");
            assert_eq!(first, second);
        }
    }

    #[test]
    fn find_cookie_skips_empty_and_takes_first() {
        assert_eq!(find_cookie("a=1; b=2", "b"), Some("2"));
        assert_eq!(find_cookie("b=; b=2; b=3", "b"), Some("2"));
        assert_eq!(find_cookie("b=x%20y", "b"), Some("x%20y"));
        assert_eq!(find_cookie("flag; b", "b"), None);
        assert_eq!(find_cookie("", "b"), None);
    }
}
