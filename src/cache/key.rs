//! Request fingerprints used to name cache entries

use std::collections::BTreeMap;
use std::fmt;

use sha2::{Digest, Sha256};

/// Query parameters for an upstream request.
///
/// A `BTreeMap` keeps the parameters sorted by name, so two maps built from
/// the same pairs in a different order serialize identically.
pub type QueryParams = BTreeMap<String, String>;

/// Builds a `QueryParams` map from any iterator of key/value pairs
pub fn query_params<I, K, V>(pairs: I) -> QueryParams
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// SHA-256 fingerprint of a logical request (resolved URL + sorted params)
///
/// Stored as lowercase hex; this string is also the cache file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Computes the key for a resolved URL and its query parameters
    ///
    /// An empty parameter set contributes nothing to the hash, so
    /// `key(url, {})` equals the hash of the bare URL.
    pub fn new(url: &str, params: &QueryParams) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        if !params.is_empty() {
            // Serializing a BTreeMap<String, String> cannot fail
            let encoded = serde_json::to_string(params).unwrap_or_default();
            hasher.update(encoded.as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// Returns the hex fingerprint
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://api.sofascore.com/api/v1/sport/football/scheduled-events/2025-10-28";

    #[test]
    fn test_key_is_deterministic() {
        let params = query_params([("page", "1")]);
        assert_eq!(CacheKey::new(URL, &params), CacheKey::new(URL, &params));
    }

    #[test]
    fn test_key_ignores_param_insertion_order() {
        let mut a = QueryParams::new();
        a.insert("season".to_string(), "2025".to_string());
        a.insert("league".to_string(), "39".to_string());
        a.insert("status".to_string(), "FT".to_string());

        let mut b = QueryParams::new();
        b.insert("status".to_string(), "FT".to_string());
        b.insert("league".to_string(), "39".to_string());
        b.insert("season".to_string(), "2025".to_string());

        assert_eq!(CacheKey::new(URL, &a), CacheKey::new(URL, &b));
    }

    #[test]
    fn test_key_differs_by_url_and_params() {
        let empty = QueryParams::new();
        let page1 = query_params([("page", "1")]);
        let page2 = query_params([("page", "2")]);

        let base = CacheKey::new(URL, &empty);
        assert_ne!(base, CacheKey::new("https://api.sofascore.com/api/v1/team/1", &empty));
        assert_ne!(base, CacheKey::new(URL, &page1));
        assert_ne!(CacheKey::new(URL, &page1), CacheKey::new(URL, &page2));
    }

    #[test]
    fn test_key_is_256_bit_hex() {
        let key = CacheKey::new(URL, &QueryParams::new());
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key.to_string(), key.as_str());
    }
}
