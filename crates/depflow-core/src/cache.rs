//! TTL-bounded result cache, injected into the pipeline

use crate::model::FlowchartResult;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One hour, the default lifetime of a computed result.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Cache key. The branch is deliberately not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub owner: String,
    pub repo: String,
}

impl CacheKey {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Standard get/set TTL contract. A `set` publishes a complete result in a
/// single step; readers never observe a partially written entry.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<Option<Arc<FlowchartResult>>, CacheError>;

    fn set(&self, key: CacheKey, value: Arc<FlowchartResult>, ttl: Duration) -> Result<(), CacheError>;

    fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError>;
}

/// Cache entry with expiration
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Arc<FlowchartResult>,
    pub inserted: Instant,
    pub cached_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn is_expired(&self) -> bool {
        self.inserted.elapsed() > self.ttl
    }
}

/// Process-local cache backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear expired entries
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    /// When the entry for `key` was written, if it is still live.
    pub fn cached_at(&self, key: &CacheKey) -> Option<DateTime<Utc>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.cached_at)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            expired_entries: self.entries.iter().filter(|e| e.is_expired()).count(),
        }
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<Arc<FlowchartResult>>, CacheError> {
        let hit = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(Arc::clone(&entry.value))),
            Some(_) => true,
            None => false,
        };
        if hit {
            self.entries.remove_if(key, |_, entry| entry.is_expired());
            tracing::debug!("Cache entry expired: {}", key);
        }
        Ok(None)
    }

    fn set(&self, key: CacheKey, value: Arc<FlowchartResult>, ttl: Duration) -> Result<(), CacheError> {
        let entry = CacheEntry {
            value,
            inserted: Instant::now(),
            cached_at: Utc::now(),
            ttl,
        };
        let purged = self.purge_expired();
        if purged > 0 {
            tracing::debug!("Purged {} expired cache entries", purged);
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
}
