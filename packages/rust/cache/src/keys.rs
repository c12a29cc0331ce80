//! Deterministic cache-key derivation.
//!
//! A cache key is a relative path under the cache root. Scalar identifiers
//! (course id, skill id) compose directly into the path; translation
//! batches are fingerprinted by hashing the canonical JSON encoding of the
//! exact ordered word list, so the same batch always maps to the same key
//! and a reordered batch maps to a different one.

use std::path::PathBuf;

use sha2::{Digest, Sha256};

/// A derived cache key: a relative `.json` path under the cache root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(PathBuf);

impl CacheKey {
    /// The relative path this key maps to.
    pub fn as_path(&self) -> &std::path::Path {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Key for the full course catalog.
pub fn courses() -> CacheKey {
    CacheKey(PathBuf::from("courses.json"))
}

/// Key for one course's skill list.
pub fn course_skills(course_id: &str) -> CacheKey {
    CacheKey(PathBuf::from("skills").join(format!("{course_id}.json")))
}

/// Key for one skill's word list.
pub fn skill_words(skill_id: &str) -> CacheKey {
    CacheKey(PathBuf::from("words").join(format!("{skill_id}.json")))
}

/// Key for one translation batch, namespaced by course.
///
/// The leaf segment is the SHA-256 hex digest of the JSON-encoded ordered
/// word list. Order-sensitive by design: `["a","b"]` and `["b","a"]` are
/// different requests.
pub fn translation_batch(course_id: &str, words: &[String]) -> CacheKey {
    let canonical = serde_json::to_string(words).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let fingerprint = format!("{:x}", hasher.finalize());

    CacheKey(
        PathBuf::from("translate")
            .join(course_id)
            .join(format!("{fingerprint}.json")),
    )
}
