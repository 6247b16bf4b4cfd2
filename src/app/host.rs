//! The storefront host: shared state plus one identity per open tab
//!
//! A `Storefront` owns everything the services need: configuration, the
//! key-value backend, the change-notification bus and the order id
//! generator. Each value also carries an origin id. Two handles with the
//! same backend and bus but different origins behave like two browser tabs
//! on the same storage: writes from one show up as change events in the
//! other.

use crate::config::StorefrontConfig;
use crate::core::error::{StorageError, StorefrontResult};
use crate::core::events::EventBus;
use crate::core::service::KvBackend;
use crate::entities::order::OrderIdGenerator;
use crate::services::{AdminService, CartService, CatalogService, ContentService, OrderService};
use crate::storage::{ChangeFeed, Collection, InMemoryKv, Repository};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

/// Handle to a storefront; cheap to clone
///
/// # Example
///
/// ```rust,ignore
/// let store = Storefront::in_memory();
/// store.cart().add(&product, 2).await?;
/// let order = store.orders().place_order(&form).await?;
/// ```
#[derive(Clone)]
pub struct Storefront {
    config: Arc<StorefrontConfig>,
    backend: Arc<dyn KvBackend>,
    bus: EventBus,
    origin: Uuid,
    ids: Arc<OrderIdGenerator>,
}

impl Storefront {
    /// Build the host from builder components
    pub(crate) fn from_components(
        config: StorefrontConfig,
        backend: Arc<dyn KvBackend>,
        bus: EventBus,
    ) -> Self {
        tracing::debug!(backend = backend.name(), "Storefront ready");
        Self {
            config: Arc::new(config),
            backend,
            bus,
            origin: Uuid::new_v4(),
            ids: Arc::new(OrderIdGenerator::new()),
        }
    }

    /// Default configuration over a fresh in-memory backend
    pub fn in_memory() -> Self {
        let config = StorefrontConfig::default();
        let bus = EventBus::new(config.event_capacity);
        Self::from_components(config, Arc::new(InMemoryKv::new()), bus)
    }

    /// A second handle on the same storage with its own origin
    pub fn open_tab(&self) -> Self {
        Self {
            origin: Uuid::new_v4(),
            ..self.clone()
        }
    }

    pub fn origin(&self) -> Uuid {
        self.origin
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Typed repository for one collection, bound to this handle
    pub fn repository<T>(&self, collection: Collection) -> Repository<T>
    where
        T: Serialize + DeserializeOwned + Default + Send + Sync,
    {
        Repository::new(
            Arc::clone(&self.backend),
            self.bus.clone(),
            self.origin,
            collection,
        )
    }

    /// Collections that currently hold data, in key order
    ///
    /// Keys outside the storefront layout are ignored.
    pub async fn stored_collections(&self) -> StorefrontResult<Vec<Collection>> {
        let keys = self.backend.keys().await.map_err(|e| StorageError::Backend {
            backend: self.backend.name().to_string(),
            message: e.to_string(),
        })?;
        Ok(keys.iter().filter_map(|k| Collection::from_key(k)).collect())
    }

    /// Changes to `collection` made by other handles
    pub fn watch(&self, collection: Collection) -> ChangeFeed {
        self.repository::<serde_json::Value>(collection).watch()
    }

    pub fn cart(&self) -> CartService {
        CartService::new(
            self.repository(Collection::Cart),
            self.repository(Collection::AppliedCoupon),
        )
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(
            self.repository(Collection::Orders),
            self.cart(),
            Arc::clone(&self.config),
            Arc::clone(&self.ids),
        )
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(
            self.repository(Collection::Products),
            self.repository(Collection::Reviews),
            self.repository(Collection::Wishlist),
            self.repository(Collection::RecentlyViewed),
            self.config.recently_viewed_limit,
        )
    }

    pub fn content(&self) -> ContentService {
        ContentService::new(
            self.repository(Collection::Slides),
            self.repository(Collection::SiteConfig),
            self.repository(Collection::Newsletter),
            self.repository(Collection::ContactMessages),
        )
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(
            self.repository(Collection::Session),
            Arc::new(self.config.admin.clone()),
        )
    }
}
