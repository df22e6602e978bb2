use std::sync::Arc;
use async_trait::async_trait;
use flurry::HashMap;
use crate::domain::{Counter, CounterError};
use super::{CounterStorage, Datastore, StorageResult};

const NAME: &str = "memory";

/// Keeps counters for the lifetime of the process. Every handle returned by
/// [`Datastore::init`] shares the map of the instance it was created from.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    counters: Arc<HashMap<String, Counter>>,
}

impl MemoryStorage {
    fn get_sync(&self, uuid: &str) -> StorageResult<Counter> {
        let guard = self.counters.guard();
        self.counters.get(uuid, &guard)
            .cloned()
            .ok_or_else(|| CounterError::not_found(uuid))
    }

    fn create_sync(&self, counter: Counter) -> StorageResult<Counter> {
        let guard = self.counters.guard();
        match self.counters.try_insert(counter.uuid.clone(), counter, &guard) {
            Ok(stored) => Ok(stored.clone()),
            Err(err) => {
                log::debug!("double creation of: {}", err.current.uuid);
                Err(CounterError::already_exists(&err.current.uuid))
            }
        }
    }

    fn compute_sync<F>(&self, uuid: &str, remap: F) -> StorageResult<Counter>
    where F: FnOnce(&Counter) -> Counter
    {
        let guard = self.counters.guard();
        self.counters.compute_if_present(uuid, |_, current| Some(remap(current)), &guard)
            .cloned()
            .ok_or_else(|| CounterError::not_found(uuid))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.counters.len()
    }
}

#[async_trait]
impl Datastore for MemoryStorage {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn init(&self, _params: &str) -> StorageResult<Arc<dyn CounterStorage>> {
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl CounterStorage for MemoryStorage {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn terminate(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn get(&self, uuid: &str) -> StorageResult<Counter> {
        self.get_sync(uuid)
    }

    async fn create(&self, counter: Counter) -> StorageResult<Counter> {
        self.create_sync(counter)
    }

    async fn update(&self, counter: Counter) -> StorageResult<Counter> {
        let uuid = counter.uuid.clone();
        self.compute_sync(&uuid, move |_| counter)
    }

    async fn increment(&self, uuid: &str) -> StorageResult<Counter> {
        // a None from the remapping removes the entry
        let mut overflowed = false;
        let counter = self.compute_sync(uuid, |current| current.incremented()
            .unwrap_or_else(|| {
                overflowed = true;
                current.clone()
            }))?;
        if overflowed {
            Err(CounterError::overflow(uuid))
        } else {
            Ok(counter)
        }
    }
}
