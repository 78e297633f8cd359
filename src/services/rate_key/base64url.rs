//! base64url (RFC 4648 §5) → bytes
//!
//! JWT の各 segment は padding なしの base64url で来るので、標準 alphabet に戻して
//! `=` を補ってから標準の decoder に渡す。

use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

/// Standard alphabet, canonical padding, but tolerant of non-zero trailing bits
/// in the last quantum (same leniency as a browser's `atob`).
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a single base64url segment.
///
/// - `-` → `+`, `_` → `/`
/// - pad with `=` up to a multiple of 4
/// - decode with the standard alphabet
///
/// A segment whose length is `4n + 1` can never be valid and fails on the padding.
pub fn decode(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let mut standard: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    STANDARD_LENIENT.decode(standard)
}
