use std::time::Instant;
use async_trait::async_trait;
use crate::domain::Counter;
use super::{CounterService, ServiceResult};

pub struct LoggingMiddleware<S> {
    inner: S,
}

impl<S: CounterService> LoggingMiddleware<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

fn log_call(method: &str, input: &str, res: &ServiceResult<Counter>, begin: Instant) {
    let took = begin.elapsed();
    match res {
        Ok(c) => log::debug!("method={method} input={input} output.uuid={} output.name={} output.count={} took={took:?}",
            c.uuid, c.name, c.count),
        Err(e) => log::error!("method={method} input={input} error=\"{e}\" took={took:?}"),
    }
}

#[async_trait]
impl<S: CounterService> CounterService for LoggingMiddleware<S> {
    async fn exists(&self, uuid: &str) -> ServiceResult<Counter> {
        let begin = Instant::now();
        let res = self.inner.exists(uuid).await;
        log_call("Exists", uuid, &res, begin);
        res
    }

    async fn create(&self, uuid: &str, name: &str) -> ServiceResult<Counter> {
        let begin = Instant::now();
        let res = self.inner.create(uuid, name).await;
        log_call("Create", &format!("{uuid}/{name}"), &res, begin);
        res
    }

    async fn increment(&self, uuid: &str) -> ServiceResult<Counter> {
        let begin = Instant::now();
        let res = self.inner.increment(uuid).await;
        log_call("Increment", uuid, &res, begin);
        res
    }

    async fn terminate(&self) -> ServiceResult<()> {
        let begin = Instant::now();
        let res = self.inner.terminate().await;
        let took = begin.elapsed();
        match &res {
            Ok(()) => log::debug!("method=Terminate took={took:?}"),
            Err(e) => log::error!("method=Terminate error=\"{e}\" took={took:?}"),
        }
        res
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use crate::service::{CounterService, StorageCounterService};
    use crate::storage::MemoryStorage;
    use super::LoggingMiddleware;

    #[tokio::test]
    async fn test_passes_results_through() {
        let service = LoggingMiddleware::new(StorageCounterService::new(Arc::new(MemoryStorage::default())));
        let uuid = "11111111-1111-5111-8111-111111111111";
        assert!(service.increment(uuid).await.is_err());
        let counter = service.create(uuid, "alice").await.expect("couldn't create a counter");
        assert_eq!(counter.count, 0);
        let counter = service.increment(uuid).await.expect("couldn't increment the counter");
        assert_eq!(counter.count, 1);
        assert_eq!(service.exists(uuid).await.expect("the counter doesn't exist").count, 1);
        service.terminate().await.expect("couldn't terminate the service");
    }
}
