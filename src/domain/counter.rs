use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Counter {
    pub uuid: String,
    pub name: String,
    pub count: i32,
    pub created_at: DateTime<Utc>,
}

impl Counter {
    /// A fresh counter: zero count, stamped with the current time.
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            count: 0,
            created_at: Utc::now(),
        }
    }

    /// `None` once the count has reached its maximum.
    pub fn incremented(&self) -> Option<Self> {
        let count = self.count.checked_add(1)?;
        Some(Self {
            count,
            ..self.clone()
        })
    }
}
