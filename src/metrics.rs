use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use once_cell::sync::Lazy;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, TextEncoder};
use prometheus::core::Collector;

pub const LABELS: [&str; 2] = ["method", "error"];

/// Register additional metrics of our own structs by using this registry instance.
static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry(prometheus::Registry::new()));

pub static REQUEST_COUNT: Lazy<IntCounterVec> = Lazy::new(|| {
    let opts = Opts::new("counter_service_requests_total", "count of counter service calls");
    IntCounterVec::new(opts, &LABELS)
        .unwrap_or_else(|e| panic!("unable to create the request counter: {e}"))
});
pub static REQUEST_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    let opts = HistogramOpts::new("counter_service_request_duration_seconds", "duration of counter service calls in seconds");
    HistogramVec::new(opts, &LABELS)
        .unwrap_or_else(|e| panic!("unable to create the latency histogram: {e}"))
});

/// Adds the `/metrics` route and wraps every route registered so far into the HTTP metrics layer.
pub fn init(app: axum::Router) -> axum::Router {
    let prometheus = REGISTRY
        .register("request count", REQUEST_COUNT.clone())
        .register("request latency", REQUEST_LATENCY.clone())
        .unwrap();

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    app
        .route("/metrics", get(|| async move {
            let mut buffer = vec![];
            let metrics = prometheus.gather();
            if let Err(e) = TextEncoder::new().encode(&metrics, &mut buffer) {
                log::error!("couldn't encode the service metrics: {e}");
            }
            let custom_metrics = String::from_utf8_lossy(&buffer);

            metric_handle.render() + custom_metrics.as_ref()
        }))
        .layer(prometheus_layer)
}

struct Registry(prometheus::Registry);

impl Registry {
    fn register<C: Collector + 'static>(&self, name: &str, collector: C) -> &Self {
        self.0.register(Box::new(collector))
            .unwrap_or_else(|e| panic!("unable to register the {name} metric: {e}"));
        self
    }

    fn unwrap(&self) -> prometheus::Registry {
        self.0.clone()
    }
}
