//! Process-lifetime memo of resolved lineages
//!
//! Keyed by the lower-cased normalized name. An entry is written once and
//! never replaced; the only way to drop entries is [`SessionCache::clear`].
//! Cloning yields another handle onto the same store.

use crate::models::Lineage;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Clone, Default)]
pub struct SessionCache {
    entries: Arc<Mutex<HashMap<String, Lineage>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Lineage> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Stores `lineage` unless `key` already has an entry; returns the stored record
    pub async fn insert(&self, key: String, lineage: Lineage) -> Lineage {
        self.entries.lock().await.entry(key).or_insert(lineage).clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Drop every entry, returning how many were removed
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let count = entries.len();
        entries.clear();
        count
    }

    /// Exclusive access for a whole check-resolve-store sequence
    pub(crate) async fn lock(&self) -> SessionCacheGuard<'_> {
        SessionCacheGuard {
            entries: self.entries.lock().await,
        }
    }
}

/// Held while one name is being resolved so concurrent callers
/// cannot issue a second remote lookup for the same key
pub(crate) struct SessionCacheGuard<'a> {
    entries: MutexGuard<'a, HashMap<String, Lineage>>,
}

impl SessionCacheGuard<'_> {
    pub fn get(&self, key: &str) -> Option<&Lineage> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, lineage: Lineage) -> Lineage {
        self.entries.entry(key).or_insert(lineage).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_write_wins() {
        let cache = SessionCache::new();
        let stored = cache.insert("foo".into(), Lineage::Unresolved).await;
        assert_eq!(stored, Lineage::Unresolved);

        let stored = cache.insert("foo".into(), Lineage::Unclassified).await;
        assert_eq!(stored, Lineage::Unresolved);
        assert_eq!(cache.get("foo").await, Some(Lineage::Unresolved));
    }

    #[tokio::test]
    async fn test_clear_reports_count() {
        let cache = SessionCache::new();
        cache.insert("a".into(), Lineage::Unresolved).await;
        cache.insert("b".into(), Lineage::Unresolved).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.clear().await, 2);
        assert!(cache.is_empty().await);
        assert_eq!(cache.clear().await, 0);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = SessionCache::new();
        let other = cache.clone();
        cache.insert("a".into(), Lineage::Unresolved).await;
        assert_eq!(other.len().await, 1);
    }
}
