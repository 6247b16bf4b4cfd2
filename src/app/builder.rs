//! Fluent construction of a [`Storefront`]

use super::host::Storefront;
use crate::config::{StorageConfig, StorefrontConfig};
#[cfg(not(feature = "lmdb"))]
use crate::core::error::StorageError;
use crate::core::error::StorefrontResult;
use crate::core::events::EventBus;
use crate::core::service::KvBackend;
use crate::storage::InMemoryKv;
use std::path::Path;
use std::sync::Arc;

/// Builder for a storefront host
///
/// Without an explicit backend, the one named in the configuration is
/// opened.
///
/// # Example
///
/// ```ignore
/// let store = StorefrontBuilder::new()
///     .with_config(StorefrontConfig::from_yaml_file("storefront.yaml")?)
///     .with_event_bus(256)
///     .build()?;
/// ```
#[derive(Default)]
pub struct StorefrontBuilder {
    config: Option<StorefrontConfig>,
    backend: Option<Arc<dyn KvBackend>>,
    event_capacity: Option<usize>,
}

impl StorefrontBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: StorefrontConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the configuration from a YAML file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> StorefrontResult<Self> {
        let config = StorefrontConfig::from_yaml_file(path)?;
        Ok(self.with_config(config))
    }

    /// Use this backend instead of the configured one
    pub fn with_backend(mut self, backend: impl KvBackend + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    /// Override the change-notification buffer size
    pub fn with_event_bus(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> StorefrontResult<Storefront> {
        let config = self.config.unwrap_or_default();
        let backend = match self.backend {
            Some(backend) => backend,
            None => open_backend(&config.storage)?,
        };
        let bus = EventBus::new(self.event_capacity.unwrap_or(config.event_capacity).max(1));

        Ok(Storefront::from_components(config, backend, bus))
    }
}

fn open_backend(storage: &StorageConfig) -> StorefrontResult<Arc<dyn KvBackend>> {
    match storage {
        StorageConfig::InMemory => Ok(Arc::new(InMemoryKv::new())),
        #[cfg(feature = "lmdb")]
        StorageConfig::Lmdb { path } => {
            let backend = crate::storage::LmdbKv::open(path).map_err(|e| {
                crate::core::error::StorageError::Backend {
                    backend: "lmdb".to_string(),
                    message: e.to_string(),
                }
            })?;
            tracing::info!(path = %path, "Opened LMDB storage");
            Ok(Arc::new(backend))
        }
        #[cfg(not(feature = "lmdb"))]
        StorageConfig::Lmdb { path } => {
            tracing::error!(path = %path, "LMDB storage requested but the `lmdb` feature is disabled");
            Err(StorageError::Unavailable {
                backend: "lmdb".to_string(),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Collection;

    #[test]
    fn test_default_build_is_in_memory() {
        let store = StorefrontBuilder::new().build().unwrap();
        assert_eq!(store.backend_name(), "in-memory");
        assert_eq!(store.config(), &StorefrontConfig::default());
    }

    #[tokio::test]
    async fn test_with_backend_sees_existing_data() {
        let backend = InMemoryKv::with_entries([(
            Collection::Newsletter.key(),
            r#"[{"email":"old@example.com","subscribed_at":"2024-01-01T00:00:00Z"}]"#,
        )]);
        let store = StorefrontBuilder::new().with_backend(backend).build().unwrap();
        assert!(!store.content().subscribe("OLD@example.com").await.unwrap());
    }

    #[test]
    fn test_event_capacity_override() {
        let store = StorefrontBuilder::new().with_event_bus(4).build().unwrap();
        assert_eq!(store.event_bus().receiver_count(), 0);
    }

    #[cfg(not(feature = "lmdb"))]
    #[test]
    fn test_lmdb_config_without_feature() {
        let config = StorefrontConfig {
            storage: StorageConfig::Lmdb {
                path: "/tmp/storefront".to_string(),
            },
            ..StorefrontConfig::default()
        };
        let err = StorefrontBuilder::new().with_config(config).build().err().unwrap();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
