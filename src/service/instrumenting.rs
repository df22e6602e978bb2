use std::time::Instant;
use async_trait::async_trait;
use crate::domain::Counter;
use crate::metrics::{REQUEST_COUNT, REQUEST_LATENCY};
use super::{CounterService, ServiceResult};

pub struct InstrumentingMiddleware<S> {
    inner: S,
}

impl<S: CounterService> InstrumentingMiddleware<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

fn observe<T>(method: &str, res: &ServiceResult<T>, begin: Instant) {
    let error = if res.is_err() { "true" } else { "false" };
    let labels = [method, error];
    REQUEST_COUNT.with_label_values(&labels).inc();
    REQUEST_LATENCY.with_label_values(&labels).observe(begin.elapsed().as_secs_f64());
}

#[async_trait]
impl<S: CounterService> CounterService for InstrumentingMiddleware<S> {
    async fn exists(&self, uuid: &str) -> ServiceResult<Counter> {
        let begin = Instant::now();
        let res = self.inner.exists(uuid).await;
        observe("Exists", &res, begin);
        res
    }

    async fn create(&self, uuid: &str, name: &str) -> ServiceResult<Counter> {
        let begin = Instant::now();
        let res = self.inner.create(uuid, name).await;
        observe("Create", &res, begin);
        res
    }

    async fn increment(&self, uuid: &str) -> ServiceResult<Counter> {
        let begin = Instant::now();
        let res = self.inner.increment(uuid).await;
        observe("Increment", &res, begin);
        res
    }

    async fn terminate(&self) -> ServiceResult<()> {
        self.inner.terminate().await
    }
}
