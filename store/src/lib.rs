//! Storage backends for the KV gateway.
//!
//! The gateway only ever talks to a backend through the [`KvStore`] trait:
//! four operations, string keys and values, no pagination. Backends are
//! constructed once by the hosting process and registered in a [`StoreSet`]
//! under their binding name; the namespace registry resolves binding names
//! against that set on every request.

pub mod memory;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A single key in a listing result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEntry {
    pub name: String,
}

/// Capability contract every bound backend must satisfy.
///
/// `list` returns the complete result set for the prefix in the backend's
/// own order; callers truncate but never re-sort.
#[async_trait]
pub trait KvStore: Send + Sync + std::fmt::Debug {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    async fn list(&self, prefix: &str) -> Result<Vec<KeyEntry>, StoreError>;
}

/// Backends available to the gateway, keyed by binding name.
///
/// Built once at startup; the registry borrows handles from here and never
/// constructs or tears down backends itself.
#[derive(Clone, Default)]
pub struct StoreSet {
    stores: HashMap<String, Arc<dyn KvStore>>,
}

impl StoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, binding: impl Into<String>, store: Arc<dyn KvStore>) {
        self.stores.insert(binding.into(), store);
    }

    pub fn get(&self, binding: &str) -> Option<Arc<dyn KvStore>> {
        self.stores.get(binding).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
