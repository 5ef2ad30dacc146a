//! Caching layer in front of a geocoder.
//!
//! Lookups check an in-memory memo first, then the optional disk cache,
//! and only then the wrapped geocoder. Successful answers are written
//! back to both layers; failures are never cached.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use super::cache::GeocodeCache;
use super::error::GeocodeError;
use super::{Geocoder, PlaceQuery};
use crate::domain::Place;

/// Configuration for the in-memory memo.
#[derive(Debug, Clone)]
pub struct MemoConfig {
    /// TTL for memoized places.
    pub ttl: Duration,

    /// Maximum number of memoized places.
    pub max_capacity: u64,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Geocoder with an in-memory memo and optional disk cache.
pub struct CachedGeocoder<G> {
    inner: G,
    memo: MokaCache<String, Place>,
    disk: Option<GeocodeCache>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    /// Wrap `inner` with a memo only.
    pub fn new(inner: G, config: &MemoConfig) -> Self {
        let memo = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            memo,
            disk: None,
        }
    }

    /// Add a persistent cache between the memo and `inner`.
    pub fn with_disk_cache(mut self, disk: GeocodeCache) -> Self {
        self.disk = Some(disk);
        self
    }

    /// Access the wrapped geocoder.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Access the disk cache, if any.
    pub fn disk_cache(&self) -> Option<&GeocodeCache> {
        self.disk.as_ref()
    }

    /// Drop everything held in memory. The disk cache is untouched.
    pub fn invalidate_memo(&self) {
        self.memo.invalidate_all();
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn geocode(&self, query: &PlaceQuery) -> Result<Place, GeocodeError> {
        let key = query.cache_key();

        if let Some(place) = self.memo.get(&key).await {
            debug!(key = %key, "Geocode memo hit");
            return Ok(place);
        }

        if let Some(place) = self.disk.as_ref().and_then(|disk| disk.get(query)) {
            debug!(key = %key, "Geocode disk cache hit");
            self.memo.insert(key, place.clone()).await;
            return Ok(place);
        }

        debug!(key = %key, "Geocode cache miss");
        let place = self.inner.geocode(query).await?;

        if let Some(disk) = &self.disk
            && let Err(e) = disk.insert(query, &place)
        {
            warn!(key = %key, error = %e, "Failed to persist geocode result");
        }
        self.memo.insert(key, place.clone()).await;

        Ok(place)
    }
}
