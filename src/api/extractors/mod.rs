pub mod rate_key;

pub use self::rate_key::{RateKey, RateKeyExtractor};
