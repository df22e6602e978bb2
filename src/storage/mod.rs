mod memory;
mod postgres;

#[cfg(test)]
pub(crate) mod test;

use std::sync::Arc;
use async_trait::async_trait;
use crate::domain::{Counter, CounterError};
pub use memory::*;
pub use postgres::*;

pub type StorageResult<T> = Result<T, CounterError>;

/// A not yet initialized storage variant, selectable by its name.
#[async_trait]
pub trait Datastore: Send + Sync {
    fn name(&self) -> &'static str;
    async fn init(&self, params: &str) -> StorageResult<Arc<dyn CounterStorage>>;
}

#[async_trait]
pub trait CounterStorage: Send + Sync {
    fn name(&self) -> &'static str;
    async fn terminate(&self) -> StorageResult<()>;
    async fn get(&self, uuid: &str) -> StorageResult<Counter>;
    async fn create(&self, counter: Counter) -> StorageResult<Counter>;
    async fn update(&self, counter: Counter) -> StorageResult<Counter>;
    /// Adds one to the stored count in a single step and returns the new state.
    async fn increment(&self, uuid: &str) -> StorageResult<Counter>;
}

pub struct Registry {
    datastores: Vec<Arc<dyn Datastore>>,
}

impl Registry {
    pub fn new(datastores: Vec<Arc<dyn Datastore>>) -> Self {
        Self { datastores }
    }

    pub fn with_max_connections(max_connections: u32) -> Self {
        let memory: Arc<dyn Datastore> = Arc::new(MemoryStorage::default());
        let postgres: Arc<dyn Datastore> = Arc::new(PostgresDatastore::new(max_connections));
        Self::new(vec![memory, postgres])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.datastores.iter()
            .map(|ds| ds.name())
            .collect()
    }

    pub async fn select(&self, name: &str, params: &str) -> StorageResult<Arc<dyn CounterStorage>> {
        let datastore = self.datastores.iter()
            .find(|ds| ds.name() == name)
            .ok_or_else(|| CounterError::BackendNotFound { name: name.to_owned() })?;
        log::info!("initializing the {} datastore...", datastore.name());
        datastore.init(params).await
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_max_connections(DEFAULT_MAX_CONNECTIONS)
    }
}
