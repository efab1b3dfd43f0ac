//! Application state shared across handlers.

use std::sync::Arc;

use freshcart_core::CurrencyCode;

use crate::catalog::CatalogSnapshot;
use crate::db::GroceryStore;
use crate::tools::ToolResolver;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the grocery store and the catalog snapshot.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn GroceryStore>,
    catalog: CatalogSnapshot,
    currency: CurrencyCode,
}

impl AppState {
    /// Create a new application state with an empty catalog snapshot.
    ///
    /// # Arguments
    ///
    /// * `store` - Storage backend (`PgStore` in production)
    /// * `currency` - Currency reported with every amount
    #[must_use]
    pub fn new(store: Arc<dyn GroceryStore>, currency: CurrencyCode) -> Self {
        Self::with_catalog(store, CatalogSnapshot::new(), currency)
    }

    /// Create application state around an existing snapshot.
    #[must_use]
    pub fn with_catalog(
        store: Arc<dyn GroceryStore>,
        catalog: CatalogSnapshot,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                catalog,
                currency,
            }),
        }
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn store(&self) -> &dyn GroceryStore {
        self.inner.store.as_ref()
    }

    /// Get a shared handle to the storage backend, for background tasks.
    #[must_use]
    pub fn store_handle(&self) -> Arc<dyn GroceryStore> {
        Arc::clone(&self.inner.store)
    }

    /// Get a reference to the catalog snapshot.
    #[must_use]
    pub fn catalog(&self) -> &CatalogSnapshot {
        &self.inner.catalog
    }

    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.currency
    }

    /// A tool resolver borrowing this state.
    #[must_use]
    pub fn resolver(&self) -> ToolResolver<'_> {
        ToolResolver::new(self.store(), self.catalog(), self.currency())
    }
}
