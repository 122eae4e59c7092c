//! Cache key derivation.

use std::fmt;

/// Namespace and format version prefixed to every key. Bump the version
/// when the payload format changes so stale entries are never read.
pub const KEY_NAMESPACE: &str = "switchyard:cache:v3";

/// A derived cache key.
///
/// Keys are `{namespace}:{model_id}:{hash}` where `hash` is a 32-bit rolling
/// hash of the model id and normalised prompt. Distinct prompts can collide;
/// for a best-effort cache that only costs hit quality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for `prompt` answered by `model_id`.
    ///
    /// The prompt is trimmed and lower-cased first, so keys are
    /// insensitive to surrounding whitespace and case.
    pub fn derive(prompt: &str, model_id: &str) -> Self {
        let normalized = prompt.trim().to_lowercase();
        let hash = rolling_hash(&format!("{model_id}:{normalized}"));
        Self(format!("{KEY_NAMESPACE}:{model_id}:{hash:x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the key for `prompt` answered by `model_id`.
pub fn make_key(prompt: &str, model_id: &str) -> CacheKey {
    CacheKey::derive(prompt, model_id)
}

/// `h = h * 31 + unit` over UTF-16 code units, wrapping at 32 bits,
/// returned as the absolute value.
fn rolling_hash(s: &str) -> u32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| {
            h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_hash_known_values() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(rolling_hash("a"), 97);
        // 97 * 31 + 98
        assert_eq!(rolling_hash("ab"), 3105);
    }

    #[test]
    fn rolling_hash_wraps_without_panicking() {
        let long = "z".repeat(10_000);
        let _ = rolling_hash(&long);
    }

    #[test]
    fn key_deterministic() {
        assert_eq!(make_key("hello", "omni"), make_key("hello", "omni"));
    }

    #[test]
    fn key_normalises_case_and_whitespace() {
        assert_eq!(make_key("  Hello World\n", "omni"), make_key("hello world", "omni"));
    }

    #[test]
    fn key_differs_on_model() {
        assert_ne!(make_key("hello", "omni"), make_key("hello", "logic"));
    }

    #[test]
    fn key_differs_on_prompt() {
        assert_ne!(make_key("hello", "omni"), make_key("world", "omni"));
    }

    #[test]
    fn key_is_namespaced() {
        let key = make_key("hello", "omni");
        assert!(key.as_str().starts_with("switchyard:cache:v3:omni:"));
    }

    #[test]
    fn key_hash_is_lower_hex() {
        let key = make_key("Hello", "omni");
        let hash = key.as_str().rsplit(':').next().unwrap();
        assert!(!hash.is_empty());
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
