use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use once_cell::sync::Lazy;
use regex::Regex;
use crate::domain::Counter;
use crate::service::CounterService;
use super::{ApiError, SharedService};

static UUID_V5_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[0-9A-F]{8}-[0-9A-F]{4}-5[0-9A-F]{3}-[89AB][0-9A-F]{3}-[0-9A-F]{12}$")
        .expect("invalid uuid regex")
});
static NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9]{0,15}$")
        .expect("invalid name regex")
});

pub fn is_valid_uuid(uuid: &str) -> bool {
    UUID_V5_REGEX.is_match(uuid)
}

pub fn is_valid_name(name: &str) -> bool {
    NAME_REGEX.is_match(name)
}

fn ensure_valid_uuid(uuid: String) -> Result<String, ApiError> {
    if is_valid_uuid(&uuid) {
        Ok(uuid)
    } else {
        Err(ApiError::InvalidUuid(uuid))
    }
}

pub async fn increment_handler(State(service): State<SharedService>, Path(uuid): Path<String>) -> Result<Json<Counter>, ApiError> {
    let uuid = ensure_valid_uuid(uuid)?;
    let counter = service.increment(&uuid).await?;
    Ok(Json(counter))
}

pub async fn create_handler(State(service): State<SharedService>, Path((uuid, name)): Path<(String, String)>) -> Result<(StatusCode, Json<Counter>), ApiError> {
    let uuid = ensure_valid_uuid(uuid)?;
    if !is_valid_name(&name) {
        return Err(ApiError::InvalidName(name))
    }
    let counter = service.create(&uuid, &name).await?;
    Ok((StatusCode::CREATED, Json(counter)))
}
