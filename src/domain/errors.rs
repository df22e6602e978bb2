use std::time::Duration;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CounterError {
    #[display("counter {uuid} does not exist")]
    NotFound { uuid: String },
    #[display("counter {uuid} already exists")]
    AlreadyExists { uuid: String },
    #[display("counter {uuid} cannot be incremented any further")]
    Overflow { uuid: String },
    #[display("datastore not found: {name}")]
    BackendNotFound { name: String },
    #[display("couldn't initialize the {datastore} datastore: {source}")]
    Init {
        datastore: &'static str,
        source: Box<CounterError>,
    },
    #[display("couldn't release the resources of the {datastore} datastore")]
    Teardown { datastore: &'static str },
    #[display("{operation} has timed out after {budget:?}")]
    Timeout {
        operation: &'static str,
        budget: Duration,
    },
    #[display("storage failure: {source}")]
    Storage { source: sqlx::Error },
}

impl CounterError {
    pub fn not_found(uuid: &str) -> Self {
        Self::NotFound { uuid: uuid.to_owned() }
    }

    pub fn already_exists(uuid: &str) -> Self {
        Self::AlreadyExists { uuid: uuid.to_owned() }
    }

    pub fn overflow(uuid: &str) -> Self {
        Self::Overflow { uuid: uuid.to_owned() }
    }
}

impl From<sqlx::Error> for CounterError {
    fn from(source: sqlx::Error) -> Self {
        Self::Storage { source }
    }
}
