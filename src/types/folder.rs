use crate::types::id::{non_empty, require};
use chrono::{DateTime, Utc};
use handle_errors::Error;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /folders` and `PUT /folders/{id}`.
#[derive(Deserialize, Debug, Default)]
pub struct FolderRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFolder {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FolderPatch {
    pub name: Option<String>,
}

impl FolderRequest {
    pub fn into_new(self) -> Result<NewFolder, Error> {
        Ok(NewFolder {
            name: require("name", self.name)?,
        })
    }

    pub fn into_patch(self) -> Result<FolderPatch, Error> {
        Ok(FolderPatch {
            name: non_empty("name", self.name)?,
        })
    }
}
