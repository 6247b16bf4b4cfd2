//! Typed access to one collection key
//!
//! A `Repository<T>` is the only place that turns stored text into values.
//! Reads never fail on bad data: a missing key or malformed JSON yields
//! `T::default()`. Every write and clear publishes a change event tagged
//! with the handle that made it.

use crate::core::KvBackend;
use crate::core::error::{StorageError, StorefrontError, StorefrontResult};
use crate::core::events::{ChangeEvent, EventBus, EventEnvelope};
use crate::core::record::Record;
use crate::storage::keys::Collection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use uuid::Uuid;

/// Typed repository over one collection key
pub struct Repository<T> {
    backend: Arc<dyn KvBackend>,
    bus: EventBus,
    origin: Uuid,
    collection: Collection,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            bus: self.bus.clone(),
            origin: self.origin,
            collection: self.collection,
            _marker: PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Default + Send + Sync,
{
    pub fn new(
        backend: Arc<dyn KvBackend>,
        bus: EventBus,
        origin: Uuid,
        collection: Collection,
    ) -> Self {
        Self {
            backend,
            bus,
            origin,
            collection,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.collection.key()
    }

    /// Read the collection; every failure degrades to `T::default()`
    pub async fn read(&self) -> T {
        match self.load().await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key = self.key(), error = %e, "Storage read failed, using empty value");
                T::default()
            }
        }
    }

    /// Read the collection, surfacing backend failures
    ///
    /// Malformed JSON is still treated as empty; only the backend itself can
    /// fail here. Used by read-modify-write paths so a broken backend never
    /// causes a collection to be overwritten with an empty value.
    pub async fn load(&self) -> StorefrontResult<T> {
        let key = self.key();
        let raw = self
            .backend
            .get(key)
            .await
            .map_err(|e| self.backend_error(e))?;

        let Some(text) = raw else {
            tracing::debug!(key, "Key not present, using empty value");
            return Ok(T::default());
        };

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Malformed stored value, treating as empty");
                Ok(T::default())
            }
        }
    }

    /// Replace the stored value and notify other handles
    pub async fn write(&self, value: &T) -> StorefrontResult<()> {
        let key = self.key();
        let text = serde_json::to_string(value).map_err(|e| {
            StorefrontError::Storage(StorageError::Serialization {
                key: key.to_string(),
                message: e.to_string(),
            })
        })?;

        self.backend
            .set(key, text)
            .await
            .map_err(|e| self.backend_error(e))?;

        tracing::debug!(key, origin = %self.origin, "Collection written");
        self.bus.publish(
            self.origin,
            ChangeEvent::Written {
                key: key.to_string(),
            },
        );
        Ok(())
    }

    /// Read, apply `f`, and write back. Nothing is written if `f` fails.
    pub async fn try_update<R, F>(&self, f: F) -> StorefrontResult<R>
    where
        F: FnOnce(&mut T) -> StorefrontResult<R>,
    {
        let mut value = self.load().await?;
        let result = f(&mut value)?;
        self.write(&value).await?;
        Ok(result)
    }

    /// Read, apply `f`, and write back
    pub async fn update<R, F>(&self, f: F) -> StorefrontResult<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.try_update(|value| Ok(f(value))).await
    }

    /// Remove the key and notify other handles
    pub async fn clear(&self) -> StorefrontResult<()> {
        let key = self.key();
        let existed = self
            .backend
            .remove(key)
            .await
            .map_err(|e| self.backend_error(e))?;

        if existed {
            tracing::debug!(key, origin = %self.origin, "Collection cleared");
            self.bus.publish(
                self.origin,
                ChangeEvent::Removed {
                    key: key.to_string(),
                },
            );
        }
        Ok(())
    }

    /// Follow changes to this key made by other handles
    pub fn watch(&self) -> ChangeFeed {
        ChangeFeed {
            rx: self.bus.subscribe(),
            key: self.key(),
            origin: self.origin,
        }
    }

    fn backend_error(&self, err: anyhow::Error) -> StorefrontError {
        StorefrontError::Storage(StorageError::Backend {
            backend: self.backend.name().to_string(),
            message: err.to_string(),
        })
    }
}

impl<R: Record> Repository<Vec<R>> {
    /// Find a record by id
    pub async fn find(&self, id: &str) -> Option<R> {
        self.read().await.into_iter().find(|r| r.has_id(id))
    }

    /// Insert or replace a record by id; returns `true` when it was new
    pub async fn upsert(&self, record: R) -> StorefrontResult<bool> {
        self.update(|records| {
            match records.iter_mut().find(|r| r.has_id(record.record_id())) {
                Some(existing) => {
                    *existing = record;
                    false
                }
                None => {
                    records.push(record);
                    true
                }
            }
        })
        .await
    }

    /// Remove a record by id; returns whether it existed
    pub async fn remove(&self, id: &str) -> StorefrontResult<bool> {
        self.update(|records| {
            let before = records.len();
            records.retain(|r| !r.has_id(id));
            records.len() != before
        })
        .await
    }
}

/// Change events for one key, excluding the subscribing handle's own writes
pub struct ChangeFeed {
    rx: broadcast::Receiver<EventEnvelope>,
    key: &'static str,
    origin: Uuid,
}

impl ChangeFeed {
    /// Wait for the next change; `None` once the bus is gone
    pub async fn recv(&mut self) -> Option<EventEnvelope> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) if self.accepts(&envelope) => return Some(envelope),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(key = self.key, skipped, "Change feed lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Return a pending change without waiting
    pub fn try_recv(&mut self) -> Option<EventEnvelope> {
        loop {
            match self.rx.try_recv() {
                Ok(envelope) if self.accepts(&envelope) => return Some(envelope),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(key = self.key, skipped, "Change feed lagged");
                    continue;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    fn accepts(&self, envelope: &EventEnvelope) -> bool {
        envelope.origin != self.origin && envelope.event.key() == self.key
    }
}
