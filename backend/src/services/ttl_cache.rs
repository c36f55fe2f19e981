use std::hash::Hash;
use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::models::{NewsHeadline, PriceSeries, QuoteSnapshot, TimeRange};

#[derive(Debug)]
struct CacheEntry<V> {
    value: Arc<V>,
    stored_at: DateTime<Utc>,
}

/// Thread-safe key-value cache whose entries expire after a fixed TTL.
///
/// Values are handed out as `Arc`s, so a hit returns the exact value that was
/// stored.
pub struct TtlCache<K, V> {
    entries: Arc<DashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            ttl: self.ttl,
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Fresh value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at(&self, key: &K, now: DateTime<Utc>) -> Option<Arc<V>> {
        if let Some(entry) = self.entries.get(key) {
            // an expiry past the representable range never expires
            let fresh = entry
                .stored_at
                .checked_add_signed(self.ttl)
                .map_or(true, |expires_at| now < expires_at);
            if fresh {
                return Some(Arc::clone(&entry.value));
            }
            // TTL expired, remove from cache
            drop(entry); // Release the read lock
            self.entries.remove(key);
        }
        None
    }

    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        self.insert_at(key, value, Utc::now())
    }

    pub fn insert_at(&self, key: K, value: V, now: DateTime<Utc>) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.insert(
            key,
            CacheEntry {
                value: Arc::clone(&value),
                stored_at: now,
            },
        );
        value
    }

    /// Drops every entry regardless of age. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// The three caches sitting in front of the market-data provider.
#[derive(Clone)]
pub struct MarketDataCache {
    pub series: TtlCache<(String, TimeRange), PriceSeries>,
    pub quotes: TtlCache<String, QuoteSnapshot>,
    pub news: TtlCache<String, Vec<NewsHeadline>>,
}

impl MarketDataCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            series: TtlCache::new(ttl),
            quotes: TtlCache::new(ttl),
            news: TtlCache::new(ttl),
        }
    }

    /// Manual refresh: empties every cache. Returns the number of dropped entries.
    pub fn clear_all(&self) -> usize {
        self.series.clear() + self.quotes.clear() + self.news.clear()
    }

    pub fn len(&self) -> usize {
        self.series.len() + self.quotes.len() + self.news.len()
    }
}
