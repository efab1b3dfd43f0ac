//! In-memory catalog snapshot.
//!
//! Product matching runs against a snapshot of the full catalog rather than
//! querying storage per lookup. The snapshot starts empty, is loaded at
//! startup and reloaded by a background task; tool calls that find it empty
//! load it on demand.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use freshcart_core::Product;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::db::{GroceryStore, RepositoryError};

/// Shared, cheaply cloneable catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    inner: Arc<RwLock<Arc<Vec<Product>>>>,
}

impl CatalogSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot that is already loaded.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        let snapshot = Self::new();
        snapshot.replace(products);
        snapshot
    }

    /// The current products. Cheap: clones an `Arc`.
    #[must_use]
    pub fn products(&self) -> Arc<Vec<Product>> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products().is_empty()
    }

    /// Swap in a new product list.
    pub fn replace(&self, products: Vec<Product>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(products);
    }

    /// Reload the catalog from storage.
    ///
    /// On failure the previous snapshot is kept.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the catalog could not be fetched.
    #[instrument(skip_all)]
    pub async fn refresh(&self, store: &dyn GroceryStore) -> Result<usize, RepositoryError> {
        let products = store.fetch_catalog().await?;
        let count = products.len();
        self.replace(products);
        debug!(products = count, "Catalog snapshot refreshed");
        Ok(count)
    }

    /// Load the catalog if the snapshot is empty.
    ///
    /// # Errors
    ///
    /// Returns the storage error if a load was needed and failed.
    pub async fn ensure_loaded(&self, store: &dyn GroceryStore) -> Result<(), RepositoryError> {
        if self.is_empty() {
            self.refresh(store).await?;
        }
        Ok(())
    }
}

/// Spawn a background task that reloads `snapshot` every `interval`.
///
/// Failures are logged and the previous snapshot keeps serving.
pub fn spawn_refresh(
    snapshot: CatalogSnapshot,
    store: Arc<dyn GroceryStore>,
    interval: Duration,
) -> JoinHandle<()> {
    info!(
        interval_secs = interval.as_secs(),
        "Spawning catalog refresh task"
    );
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; startup already loaded once.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = snapshot.refresh(store.as_ref()).await {
                warn!(error = %e, "Catalog refresh failed, keeping previous snapshot");
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::{FailPoint, MemoryStore};

    #[tokio::test]
    async fn test_refresh_loads_products() {
        let store = MemoryStore::with_products(vec![Product::new(
            "Apples",
            Decimal::new(120, 0),
            "kg",
            10,
        )]);
        let snapshot = CatalogSnapshot::new();
        assert!(snapshot.is_empty());

        assert_eq!(snapshot.refresh(&store).await.unwrap(), 1);
        assert!(!snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let apples = Product::new("Apples", Decimal::new(120, 0), "kg", 10);
        let store = MemoryStore::with_products(vec![apples.clone()]);
        let snapshot = CatalogSnapshot::from_products(vec![apples.clone()]);

        store.fail(FailPoint::FetchCatalog).unwrap();
        assert!(snapshot.refresh(&store).await.is_err());
        assert_eq!(snapshot.products().first().unwrap().id, apples.id);
    }

    #[tokio::test]
    async fn test_ensure_loaded_only_fetches_when_empty() {
        let store = MemoryStore::new();
        store.fail(FailPoint::FetchCatalog).unwrap();

        let loaded =
            CatalogSnapshot::from_products(vec![Product::new("Milk", Decimal::ONE, "litre", 1)]);
        loaded.ensure_loaded(&store).await.unwrap();

        let empty = CatalogSnapshot::new();
        assert!(empty.ensure_loaded(&store).await.is_err());
    }
}
