use std::fmt::Display;
use std::str::FromStr;

/// Reads and parses `key`, falling back to `default` when it's unset or malformed.
pub fn get_env_value_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            log::warn!("{key}={raw} is invalid ({e}), falling back to {default}");
            default
        }),
        Err(_) => {
            log::debug!("{key} is not set, using {default}");
            default
        }
    }
}
