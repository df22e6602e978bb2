use std::fmt::{Display, Formatter};
use crate::config::env::*;
use crate::storage::DEFAULT_MAX_CONNECTIONS;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATASTORE: &str = "memory";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub datastore: String,
    pub extra_params: String,
    pub hide_extra_params: bool,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: get_env_value_or_default("PORT", DEFAULT_PORT),
            datastore: get_env_value_or_default("DATASTORE", DEFAULT_DATASTORE.to_owned()),
            extra_params: get_env_value_or_default("EXTRA_PARAMS", String::new()),
            hide_extra_params: get_env_value_or_default("HIDE_EXTRA_PARAMS", false),
            max_connections: get_env_value_or_default("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            datastore: DEFAULT_DATASTORE.to_owned(),
            extra_params: String::new(),
            hide_extra_params: false,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Display for AppConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let extra_params = if self.hide_extra_params { "" } else { self.extra_params.as_str() };
        writeln!(f, "Options")?;
        writeln!(f, "  Port: {}", self.port)?;
        writeln!(f, "  Datastore: {}", self.datastore)?;
        writeln!(f, "  ExtraParams: {extra_params}")?;
        writeln!(f, "  HideExtraParams: {}", self.hide_extra_params)?;
        write!(f, "  MaxConnections: {}", self.max_connections)
    }
}
