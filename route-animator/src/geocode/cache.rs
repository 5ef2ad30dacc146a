//! Disk-based cache for geocoding results.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::PlaceQuery;
use super::error::GeocodeError;
use crate::domain::{Coordinate, Place};

/// A cached lookup result as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedPlace {
    lat: f64,
    lon: f64,
    display_name: String,
}

impl From<&Place> for CachedPlace {
    fn from(place: &Place) -> Self {
        Self {
            lat: place.coordinate.lat(),
            lon: place.coordinate.lon(),
            display_name: place.display_name.clone(),
        }
    }
}

/// Configuration for the geocode disk cache.
#[derive(Debug, Clone)]
pub struct GeocodeCacheConfig {
    /// Path to the cache file.
    pub path: PathBuf,
    /// Save to disk after every insert.
    pub write_through: bool,
}

impl GeocodeCacheConfig {
    /// Create a new cache config with the given path, saving on every insert.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_through: true,
        }
    }

    /// Only save when [`GeocodeCache::save`] is called.
    pub fn with_write_through(mut self, write_through: bool) -> Self {
        self.write_through = write_through;
        self
    }
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self::new("geocode_cache.json")
    }
}

/// Persistent map from [`PlaceQuery::cache_key`] to resolved place.
///
/// The file is a flat JSON object so it can be inspected and edited by
/// hand. Geocoded places don't move, so entries never expire.
///
/// Saves are serialized and replace the file by rename, so concurrent
/// inserts can't drop each other's entries or leave a torn file.
#[derive(Debug)]
pub struct GeocodeCache {
    config: GeocodeCacheConfig,
    entries: RwLock<BTreeMap<String, CachedPlace>>,
    save_lock: Mutex<()>,
}

impl GeocodeCache {
    /// Open the cache, loading any existing file.
    ///
    /// A missing or unreadable file gives an empty cache.
    pub fn open(config: GeocodeCacheConfig) -> Self {
        let entries = Self::load(&config.path).unwrap_or_default();
        debug!(path = %config.path.display(), entries = entries.len(), "Opened geocode cache");
        Self {
            config,
            entries: RwLock::new(entries),
            save_lock: Mutex::new(()),
        }
    }

    fn load(path: &Path) -> Option<BTreeMap<String, CachedPlace>> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt geocode cache");
                None
            }
        }
    }

    /// Look up a cached place.
    pub fn get(&self, query: &PlaceQuery) -> Option<Place> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let cached = entries.get(&query.cache_key())?;
        let coordinate = Coordinate::new(cached.lat, cached.lon).ok()?;
        Some(Place::new(coordinate, cached.display_name.clone()))
    }

    /// Store a place, saving to disk if write-through is on.
    pub fn insert(&self, query: &PlaceQuery, place: &Place) -> Result<(), GeocodeError> {
        {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.insert(query.cache_key(), CachedPlace::from(place));
        }
        if self.config.write_through {
            self.save()?;
        }
        Ok(())
    }

    /// Write the cache to disk.
    ///
    /// Creates parent directories if they don't exist. The snapshot is
    /// taken under the save lock, so the last save to finish always holds
    /// every entry inserted before it started.
    pub fn save(&self) -> Result<(), GeocodeError> {
        let _guard = self.save_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let json = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            serde_json::to_string_pretty(&*entries).map_err(|e| GeocodeError::Cache {
                message: format!("failed to serialize cache: {}", e),
            })?
        };

        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| GeocodeError::Cache {
                message: format!("failed to create cache directory: {}", e),
            })?;
        }

        // Same directory, so the rename stays on one filesystem
        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, json).map_err(|e| GeocodeError::Cache {
            message: format!("failed to write cache file: {}", e),
        })?;
        std::fs::rename(&tmp_path, &self.config.path).map_err(|e| GeocodeError::Cache {
            message: format!("failed to replace cache file: {}", e),
        })?;

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.config.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Number of cached places.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn lisbon() -> Place {
        Place::new(
            Coordinate::new(38.7223, -9.1393).unwrap(),
            "Lisboa, Portugal",
        )
    }

    #[test]
    fn save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("geocode.json");
        let query = PlaceQuery::new("Lisbon", "Portugal", "pt");

        let cache = GeocodeCache::open(GeocodeCacheConfig::new(&path));
        assert!(cache.is_empty());
        cache.insert(&query, &lisbon()).unwrap();

        let reopened = GeocodeCache::open(GeocodeCacheConfig::new(&path));
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get(&query), Some(lisbon()));
    }

    #[test]
    fn keyed_by_normalized_query() {
        let dir = tempdir().unwrap();
        let cache = GeocodeCache::open(GeocodeCacheConfig::new(dir.path().join("g.json")));
        cache
            .insert(&PlaceQuery::new("Lisbon", "Portugal", "pt"), &lisbon())
            .unwrap();

        assert!(cache.get(&PlaceQuery::new(" lisbon", "PORTUGAL", "PT")).is_some());
        assert!(cache.get(&PlaceQuery::new("Lisbon", "Portugal", "en")).is_none());
    }

    #[test]
    fn missing_file_is_empty() {
        let cache = GeocodeCache::open(GeocodeCacheConfig::new("/nonexistent/path/geocode.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("geocode.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let cache = GeocodeCache::open(GeocodeCacheConfig::new(&path));
        assert!(cache.is_empty());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("geocode.json");
        let cache = GeocodeCache::open(GeocodeCacheConfig::new(&path));

        cache
            .insert(&PlaceQuery::new("Lisbon", "Portugal", "pt"), &lisbon())
            .unwrap();
        assert!(path.exists());
        assert_eq!(cache.path(), path.as_path());
    }

    #[test]
    fn write_through_off_defers_saving() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("geocode.json");
        let config = GeocodeCacheConfig::new(&path).with_write_through(false);
        let cache = GeocodeCache::open(config);

        cache
            .insert(&PlaceQuery::new("Lisbon", "Portugal", "pt"), &lisbon())
            .unwrap();
        assert!(!path.exists());

        cache.save().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn concurrent_inserts_all_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("geocode.json");
        let cache = GeocodeCache::open(GeocodeCacheConfig::new(&path));

        std::thread::scope(|s| {
            for thread in 0..8 {
                let cache = &cache;
                s.spawn(move || {
                    for i in 0..25 {
                        let query = PlaceQuery::new(format!("Town {thread}-{i}"), "Portugal", "pt");
                        cache.insert(&query, &lisbon()).unwrap();
                    }
                });
            }
        });

        let reopened = GeocodeCache::open(GeocodeCacheConfig::new(&path));
        assert_eq!(reopened.len(), 200);
        assert!(reopened.get(&PlaceQuery::new("Town 7-24", "Portugal", "pt")).is_some());
        assert!(!cache.tmp_path().exists());
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("geocode.json");
        std::fs::write(&path, "{}").unwrap();

        let cache = GeocodeCache::open(GeocodeCacheConfig::new(&path));
        cache
            .insert(&PlaceQuery::new("Lisbon", "Portugal", "pt"), &lisbon())
            .unwrap();

        let reopened = GeocodeCache::open(GeocodeCacheConfig::new(&path));
        assert_eq!(reopened.len(), 1);
        assert!(!cache.tmp_path().exists());
    }

    #[test]
    fn default_config() {
        let config = GeocodeCacheConfig::default();
        assert_eq!(config.path, PathBuf::from("geocode_cache.json"));
        assert!(config.write_through);
    }
}
