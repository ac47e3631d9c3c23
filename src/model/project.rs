use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project tasks can be filed under (`… in #name`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A collection events and notes can be tagged into (`@name`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
