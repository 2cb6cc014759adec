use crate::types::id::{parse_id, parse_ids, require};
use crate::types::patch::{present, Patch};
use chrono::{DateTime, Utc};
use handle_errors::Error;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /notes` and `PUT /notes/{id}`. Every field is optional here;
/// `into_new` and `into_patch` decide what is required.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub folder_id: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<Uuid>,
    pub tags: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Patch<String>,
    pub folder_id: Patch<Uuid>,
    /// Replaces the whole set when present.
    pub tags: Option<Vec<Uuid>>,
}

impl NoteRequest {
    pub fn into_new(self) -> Result<NewNote, Error> {
        let title = require("title", self.title.flatten())?;
        let folder_id = match Patch::from_nullable(self.folder_id) {
            Patch::Set(raw) => Some(parse_id(&raw, "folderId")?),
            _ => None,
        };
        let tags = match self.tags {
            Some(raw) => parse_ids(&raw, "tags")?,
            None => Vec::new(),
        };
        Ok(NewNote {
            title,
            content: Patch::from_nullable(self.content).apply(None),
            folder_id,
            tags,
        })
    }

    pub fn into_patch(self) -> Result<NotePatch, Error> {
        let title = match self.title {
            Some(title) => Some(require("title", title)?),
            None => None,
        };
        let folder_id = Patch::from_nullable(self.folder_id)
            .try_map(|raw| parse_id(&raw, "folderId"))?;
        let tags = self
            .tags
            .map(|raw| parse_ids(&raw, "tags"))
            .transpose()?;
        Ok(NotePatch {
            title,
            content: Patch::from_nullable(self.content),
            folder_id,
            tags,
        })
    }
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_keep()
            && self.folder_id.is_keep()
            && self.tags.is_none()
    }
}

/// Query string of `GET /notes`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NoteQuery {
    pub search_term: Option<String>,
    pub folder_id: Option<String>,
    pub tag_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteFilter {
    pub search_term: Option<String>,
    pub folder_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
}

fn filled(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl NoteQuery {
    pub fn into_filter(self) -> Result<NoteFilter, Error> {
        Ok(NoteFilter {
            search_term: filled(self.search_term),
            folder_id: filled(self.folder_id)
                .map(|raw| parse_id(&raw, "folderId"))
                .transpose()?,
            tag_id: filled(self.tag_id)
                .map(|raw| parse_id(&raw, "tagId"))
                .transpose()?,
        })
    }
}

impl NoteFilter {
    /// Case-insensitive substring match on title or content, plus the exact
    /// folder and tag filters.
    pub fn matches(&self, note: &Note) -> bool {
        if let Some(folder_id) = self.folder_id {
            if note.folder_id != Some(folder_id) {
                return false;
            }
        }
        if let Some(tag_id) = self.tag_id {
            if !note.tags.contains(&tag_id) {
                return false;
            }
        }
        match &self.search_term {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                note.title.to_lowercase().contains(&term)
                    || note
                        .content
                        .as_deref()
                        .map_or(false, |c| c.to_lowercase().contains(&term))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: serde_json::Value) -> NoteRequest {
        serde_json::from_value(body).unwrap()
    }

    fn note(title: &str, content: Option<&str>) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.map(str::to_string),
            folder_id: None,
            tags: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_requires_title() {
        let err = request(json!({ "content": "body" })).into_new().unwrap_err();
        assert!(matches!(err, Error::MissingField("title")));
    }

    #[test]
    fn create_omits_absent_folder() {
        let new = request(json!({ "title": "t", "folderId": "" })).into_new().unwrap();
        assert_eq!(new.folder_id, None);
        assert!(new.tags.is_empty());
    }

    #[test]
    fn create_rejects_malformed_tag() {
        let err = request(json!({ "title": "t", "tags": ["bad"] }))
            .into_new()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidId("tags")));
    }

    #[test]
    fn patch_distinguishes_absent_from_cleared() {
        let patch = request(json!({ "title": "x" })).into_patch().unwrap();
        assert_eq!(patch.title.as_deref(), Some("x"));
        assert!(patch.content.is_keep());
        assert!(patch.folder_id.is_keep());
        assert_eq!(patch.tags, None);

        let patch = request(json!({ "folderId": "", "content": null }))
            .into_patch()
            .unwrap();
        assert_eq!(patch.folder_id, Patch::Clear);
        assert_eq!(patch.content, Patch::Clear);
    }

    #[test]
    fn patch_rejects_malformed_folder() {
        let err = request(json!({ "folderId": "123" })).into_patch().unwrap_err();
        assert!(matches!(err, Error::InvalidId("folderId")));
    }

    #[test]
    fn patch_rejects_blank_title() {
        for title in [json!(""), json!("  "), json!(null)] {
            let err = request(json!({ "title": title })).into_patch().unwrap_err();
            assert!(matches!(err, Error::MissingField("title")));
        }
    }

    #[test]
    fn create_treats_empty_content_as_absent() {
        let new = request(json!({ "title": "t", "content": "" })).into_new().unwrap();
        assert_eq!(new.content, None);
        let new = request(json!({ "title": "t", "content": "body" })).into_new().unwrap();
        assert_eq!(new.content.as_deref(), Some("body"));
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(request(json!({})).into_patch().unwrap().is_empty());
    }

    #[test]
    fn search_is_case_insensitive_on_title_or_content() {
        let filter = NoteQuery {
            search_term: Some("GaGa".into()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert!(filter.matches(&note("Lady gaga", None)));
        assert!(filter.matches(&note("music", Some("all about GAGA"))));
        assert!(!filter.matches(&note("music", Some("nothing"))));
    }

    #[test]
    fn empty_query_values_match_everything() {
        let filter = NoteQuery {
            search_term: Some(String::new()),
            folder_id: Some(String::new()),
            tag_id: None,
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter, NoteFilter::default());
        assert!(filter.matches(&note("anything", None)));
    }

    #[test]
    fn malformed_query_ids_are_invalid() {
        let err = NoteQuery {
            tag_id: Some("zzz".into()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, Error::InvalidId("tagId")));
    }

    #[test]
    fn missing_folder_is_omitted_when_serialized() {
        let value = serde_json::to_value(note("t", None)).unwrap();
        assert!(value.get("folderId").is_none());
        assert!(value.get("content").is_none());
        assert_eq!(value["tags"], json!([]));
    }
}
