use std::sync::Arc;
use std::time::Duration;

/// Copy-on-write snapshot cache
///
/// Values are stored as `Arc<V>` and replaced whole: an update builds a
/// fresh value and inserts it, so concurrent readers keep their snapshot and
/// never observe a partially updated entry. TTL keeps rarely refreshed
/// entries from going stale forever.
pub struct SnapshotCache<V: Send + Sync + 'static> {
    inner: moka::future::Cache<String, Arc<V>>,
}

impl<V: Send + Sync + 'static> SnapshotCache<V> {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let inner = moka::future::CacheBuilder::new(capacity)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<V>> {
        self.inner.get(key).await
    }

    /// Replace the entry wholesale with a freshly built value.
    pub async fn put(&self, key: String, value: V) {
        self.inner.insert(key, Arc::new(value)).await;
    }

    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    pub fn region_insights(zone: &str) -> String {
        format!("insights:{}", zone)
    }

    pub fn member_learning(member_id: &str) -> String {
        format!("learning:{}", member_id)
    }

    pub fn zone_weights(zone: &str) -> String {
        format!("weights:{}", zone)
    }
}
