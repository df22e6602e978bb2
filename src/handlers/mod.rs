mod count;


use std::sync::Arc;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use crate::domain::CounterError;
use crate::service::CounterService;
pub use count::*;

pub type SharedService = Arc<dyn CounterService>;

pub const GREETING: &str = "Hi there!
- try to call GET /count/{uuidv5} to increment a counter
- try to call POST /count/{uuidv5}/{name} to create a counter
";

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/count/:uuid", get(increment_handler))
        .route("/count/:uuid/:name", post(create_handler))
        .with_state(service)
}

async fn root_handler() -> &'static str {
    GREETING
}

#[derive(Debug)]
pub enum ApiError {
    InvalidUuid(String),
    InvalidName(String),
    Counter(CounterError),
}

impl From<CounterError> for ApiError {
    fn from(value: CounterError) -> Self {
        Self::Counter(value)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidUuid(_) | Self::InvalidName(_) => StatusCode::BAD_REQUEST,
            Self::Counter(CounterError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Counter(CounterError::AlreadyExists { .. }) => StatusCode::CONFLICT,
            Self::Counter(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::InvalidUuid(uuid) => format!("invalid uuid: {uuid}"),
            Self::InvalidName(name) => format!("invalid name: {name}"),
            Self::Counter(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("request failed: {}", self.message());
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
