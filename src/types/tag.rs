use crate::types::id::require;
use chrono::{DateTime, Utc};
use handle_errors::Error;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TagRequest {
    pub name: Option<String>,
}

/// A validated tag name, used for both create and rename.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTag {
    pub name: String,
}

impl TagRequest {
    /// Tags have a single field, so updates require it as well.
    pub fn into_new(self) -> Result<NewTag, Error> {
        Ok(NewTag {
            name: require("name", self.name)?,
        })
    }
}
