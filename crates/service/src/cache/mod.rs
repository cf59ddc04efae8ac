//! Read-through cache capability for recipe list and detail results.
//!
//! The service only sees [`CacheStore`]; the backend is chosen at startup
//! (`MokaCacheStore` in-process, or `NoopCacheStore` when caching is disabled).
//! Correctness never depends on the cache: every miss falls through to the store.

pub mod moka_store;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub use moka_store::MokaCacheStore;

/// Prefix shared by every list-query entry; wiped on any write.
pub const LIST_PREFIX: &str = "recipes_list:";
/// Prefix of single-record entries (`recipe:<uuid>`).
pub const DETAIL_PREFIX: &str = "recipe:";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Key-value cache with per-entry TTL and prefix invalidation.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError>;
    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
    /// Remove every entry whose key starts with `prefix`.
    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError>;
}

/// Cache that stores nothing; used when `cache.enabled = false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCacheStore;

#[async_trait]
impl CacheStore for NoopCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<serde_json::Value>, CacheError> { Ok(None) }
    async fn set(&self, _key: &str, _value: serde_json::Value, _ttl: Duration) -> Result<(), CacheError> { Ok(()) }
    async fn delete(&self, _key: &str) -> Result<(), CacheError> { Ok(()) }
    async fn delete_prefix(&self, _prefix: &str) -> Result<(), CacheError> { Ok(()) }
}

pub fn detail_key(id: Uuid) -> String {
    format!("{DETAIL_PREFIX}{id}")
}

/// One entry per distinct list query; the suffix is the canonical JSON of the query.
pub fn list_key<Q: Serialize>(query: &Q) -> Result<String, CacheError> {
    Ok(format!("{LIST_PREFIX}{}", serde_json::to_string(query)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Q<'a> { recipe_type: Option<&'a str>, search: Option<&'a str> }

    #[test]
    fn list_keys_share_prefix_and_differ_per_filter() {
        let a = list_key(&Q { recipe_type: Some("VEG"), search: None }).unwrap();
        let b = list_key(&Q { recipe_type: Some("VEG"), search: Some("soup") }).unwrap();
        assert!(a.starts_with(LIST_PREFIX) && b.starts_with(LIST_PREFIX));
        assert_ne!(a, b);
        assert_eq!(a, list_key(&Q { recipe_type: Some("VEG"), search: None }).unwrap());
    }

    #[test]
    fn detail_key_does_not_collide_with_list_prefix() {
        let k = detail_key(Uuid::new_v4());
        assert!(k.starts_with(DETAIL_PREFIX));
        assert!(!k.starts_with(LIST_PREFIX));
    }

    #[tokio::test]
    async fn noop_store_never_hits() {
        let c = NoopCacheStore;
        c.set("k", serde_json::json!(1), Duration::from_secs(60)).await.unwrap();
        assert!(c.get("k").await.unwrap().is_none());
    }
}
