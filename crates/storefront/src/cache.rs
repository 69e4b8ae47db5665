//! File-backed catalog snapshot cache.
//!
//! The last successfully fetched catalog is persisted as a timestamped JSON
//! snapshot so the menu can paint immediately on the next start, before the
//! backend responds. The snapshot is advisory only: a missing, stale, or
//! corrupt file reads as absent, and a failed write is logged and swallowed
//! so painting never depends on it.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use focaccia_plus_core::Product;

/// Maximum age of a snapshot before it is considered stale.
const FRESHNESS_WINDOW_SECS: i64 = 5 * 60;

/// Persisted snapshot: the catalog plus its fetch time.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    fetched_at: DateTime<Utc>,
    products: Vec<Product>,
}

/// Read/write access to the snapshot file.
#[derive(Debug, Clone)]
pub struct CatalogCache {
    path: PathBuf,
}

impl CatalogCache {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The cached catalog, if a fresh snapshot exists.
    ///
    /// Returns `None` for a missing file, a snapshot older than the
    /// freshness window, or anything that does not parse.
    #[must_use]
    pub fn read(&self) -> Option<Vec<Product>> {
        self.read_at(Utc::now())
    }

    fn read_at(&self, now: DateTime<Utc>) -> Option<Vec<Product>> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let snapshot: Snapshot = serde_json::from_str(&raw).ok()?;

        let age = now.signed_duration_since(snapshot.fetched_at);
        if age >= Duration::seconds(FRESHNESS_WINDOW_SECS) {
            return None;
        }

        Some(snapshot.products)
    }

    /// Store a snapshot of the catalog with the current timestamp.
    ///
    /// Persistence failures are logged and swallowed.
    pub fn write(&self, products: &[Product]) {
        if let Err(e) = self.try_write(products) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist catalog snapshot");
        }
    }

    fn try_write(&self, products: &[Product]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let snapshot = Snapshot {
            fetched_at: Utc::now(),
            products: products.to_vec(),
        };
        let json = serde_json::to_string(&snapshot)?;
        fs::write(&self.path, json)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use focaccia_plus_core::{Category, ProductId};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn sample_catalog() -> Vec<Product> {
        vec![Product {
            id: ProductId::new(Uuid::from_u128(1)),
            name: "Focaccia Clásica".to_string(),
            price: Decimal::new(500, 2),
            category: Category::Focaccia,
            description: Some("Romero y sal marina".to_string()),
            image_url: None,
            icon: None,
            stock: 4,
        }]
    }

    #[test]
    fn test_missing_file_reads_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::new(dir.path().join("catalog.json"));
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::new(dir.path().join("catalog.json"));

        cache.write(&sample_catalog());
        let read = cache.read().unwrap();
        assert_eq!(read, sample_catalog());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::new(dir.path().join("nested/cache/catalog.json"));

        cache.write(&sample_catalog());
        assert!(cache.read().is_some());
    }

    #[test]
    fn test_stale_snapshot_reads_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::new(dir.path().join("catalog.json"));

        cache.write(&sample_catalog());
        let later = Utc::now() + Duration::seconds(FRESHNESS_WINDOW_SECS + 1);
        assert!(cache.read_at(later).is_none());
    }

    #[test]
    fn test_fresh_snapshot_reads_present_just_before_window() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::new(dir.path().join("catalog.json"));

        cache.write(&sample_catalog());
        let later = Utc::now() + Duration::seconds(FRESHNESS_WINDOW_SECS - 10);
        assert!(cache.read_at(later).is_some());
    }

    #[test]
    fn test_corrupt_snapshot_reads_absent_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "{ not json").unwrap();

        let cache = CatalogCache::new(path);
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_failed_write_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // Parent "blocker" is a file, so the write cannot succeed.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let cache = CatalogCache::new(blocker.join("catalog.json"));
        cache.write(&sample_catalog());
        assert!(cache.read().is_none());
    }
}
