mod logging;
mod instrumenting;

use std::sync::Arc;
use async_trait::async_trait;
use crate::domain::{Counter, CounterError};
use crate::storage::CounterStorage;
pub use logging::*;
pub use instrumenting::*;

pub type ServiceResult<T> = Result<T, CounterError>;

#[async_trait]
pub trait CounterService: Send + Sync {
    async fn exists(&self, uuid: &str) -> ServiceResult<Counter>;
    async fn create(&self, uuid: &str, name: &str) -> ServiceResult<Counter>;
    async fn increment(&self, uuid: &str) -> ServiceResult<Counter>;
    async fn terminate(&self) -> ServiceResult<()>;
}

/// Applies the counter rules on top of a storage handle. Uniqueness and
/// existence are enforced by the storage operations themselves.
#[derive(Clone)]
pub struct StorageCounterService {
    storage: Arc<dyn CounterStorage>,
}

impl StorageCounterService {
    pub fn new(storage: Arc<dyn CounterStorage>) -> Self {
        Self { storage }
    }

    pub fn storage_name(&self) -> &'static str {
        self.storage.name()
    }
}

#[async_trait]
impl CounterService for StorageCounterService {
    async fn exists(&self, uuid: &str) -> ServiceResult<Counter> {
        self.storage.get(uuid).await
    }

    async fn create(&self, uuid: &str, name: &str) -> ServiceResult<Counter> {
        self.storage.create(Counter::new(uuid, name)).await
    }

    async fn increment(&self, uuid: &str) -> ServiceResult<Counter> {
        self.storage.increment(uuid).await
    }

    async fn terminate(&self) -> ServiceResult<()> {
        self.storage.terminate().await
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use futures::future::join_all;
    use crate::domain::CounterError;
    use crate::storage::MemoryStorage;
    use super::{CounterService, StorageCounterService};

    const UUID: &str = "11111111-1111-5111-8111-111111111111";
    const UNKNOWN_UUID: &str = "22222222-2222-5222-8222-222222222222";

    fn memory_service() -> StorageCounterService {
        StorageCounterService::new(Arc::new(MemoryStorage::default()))
    }

    #[tokio::test]
    async fn test_scenario() {
        let service = memory_service();
        assert_eq!(service.storage_name(), "memory");

        let counter = service.create(UUID, "alice").await.expect("couldn't create a counter");
        assert_eq!(counter.uuid, UUID);
        assert_eq!(counter.name, "alice");
        assert_eq!(counter.count, 0);

        let counter = service.increment(UUID).await.expect("couldn't increment the counter");
        assert_eq!(counter.count, 1);
        let counter = service.increment(UUID).await.expect("couldn't increment the counter");
        assert_eq!(counter.count, 2);

        let res = service.create(UUID, "alice").await;
        assert!(matches!(res, Err(CounterError::AlreadyExists { .. })));
        let res = service.increment(UNKNOWN_UUID).await;
        assert!(matches!(res, Err(CounterError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_never_created() {
        let service = memory_service();
        assert!(matches!(service.exists(UNKNOWN_UUID).await, Err(CounterError::NotFound { .. })));
        assert!(matches!(service.increment(UNKNOWN_UUID).await, Err(CounterError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_then_exists() {
        let service = memory_service();
        service.create(UUID, "alice").await.expect("couldn't create a counter");
        let counter = service.exists(UUID).await.expect("the counter doesn't exist");
        assert_eq!(counter.uuid, UUID);
        assert_eq!(counter.name, "alice");
        assert_eq!(counter.count, 0);
        assert!(counter.created_at.timestamp() > 0);
    }

    #[tokio::test]
    async fn test_second_create_keeps_the_record() {
        let service = memory_service();
        let created = service.create(UUID, "alice").await.expect("couldn't create a counter");
        service.increment(UUID).await.expect("couldn't increment the counter");
        assert!(service.create(UUID, "bob").await.is_err());
        let counter = service.exists(UUID).await.expect("the counter doesn't exist");
        assert_eq!(counter.name, "alice");
        assert_eq!(counter.count, 1);
        assert_eq!(counter.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_sequential_increments() {
        let service = memory_service();
        service.create(UUID, "alice").await.expect("couldn't create a counter");
        let mut previous = 0;
        for _ in 0..10 {
            let counter = service.increment(UUID).await.expect("couldn't increment the counter");
            assert_eq!(counter.count, previous + 1);
            previous = counter.count;
        }
        assert_eq!(previous, 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments() {
        let service = Arc::new(memory_service());
        service.create(UUID, "alice").await.expect("couldn't create a counter");

        let tasks = (0..100).map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.increment(UUID).await })
        });
        let mut counts: Vec<i32> = join_all(tasks).await
            .into_iter()
            .map(|res| res.expect("the task has panicked").expect("couldn't increment the counter").count)
            .collect();
        counts.sort();
        assert_eq!(counts, (1..=100).collect::<Vec<i32>>());
        assert_eq!(service.exists(UUID).await.expect("the counter has gone").count, 100);
    }

    #[tokio::test]
    async fn test_terminate() {
        let service = memory_service();
        service.terminate().await.expect("couldn't terminate the memory storage");
    }
}
