use crate::types::{folder::Folder, note::Note, tag::Tag};
use handle_errors::Error;
use serde::Deserialize;
use std::path::Path;

/// Fixture data loaded into an emptied store.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SeedData {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl SeedData {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path).map_err(Error::StdFileError)?;
        serde_json::from_str(&raw).map_err(Error::InvalidSeed)
    }
}
