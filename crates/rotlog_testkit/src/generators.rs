//! Property-based test generators using proptest.
//!
//! Provides strategies for payloads and payload batches, biased toward the
//! characters that break naive line- or NUL-delimited formats.

use proptest::prelude::*;

/// Characters that must survive a write/read round trip unchanged.
pub const SPECIAL_CHARS: [char; 7] = ['\0', '\n', '\t', '"', '\\', '\x1e', '\u{FFFD}'];

/// Strategy for a single payload: arbitrary text, including empty strings.
pub fn payload_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        4 => ".{0,64}",
        2 => prop::collection::vec(prop::sample::select(SPECIAL_CHARS.to_vec()), 1..16)
            .prop_map(|chars| chars.into_iter().collect::<String>()),
        1 => prop::collection::vec(any::<char>(), 0..256)
            .prop_map(|chars| chars.into_iter().collect::<String>()),
    ]
}

/// Strategy for an ordered batch of payloads.
pub fn payload_batch_strategy(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(payload_strategy(), 0..max_len)
}

/// Strategy for a rollover threshold small enough to force frequent rotation.
pub fn small_max_size_strategy() -> impl Strategy<Value = u64> {
    1u64..512
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a config for quick tests.
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
