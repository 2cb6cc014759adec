use crate::store::Backend;
use crate::types::folder::{Folder, FolderPatch, NewFolder};
use crate::types::note::{NewNote, Note, NoteFilter, NotePatch};
use crate::types::seed::SeedData;
use crate::types::tag::{NewTag, Tag};
use async_trait::async_trait;
use chrono::Utc;
use handle_errors::Error;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Collections {
    notes: HashMap<Uuid, Note>,
    folders: HashMap<Uuid, Folder>,
    tags: HashMap<Uuid, Tag>,
}

/// Process-local backend. Cascades run under a single write lock, so they are
/// atomic with respect to other requests.
#[derive(Default)]
pub struct MemoryBackend {
    data: RwLock<Collections>,
}

fn name_taken<'a, T: 'a>(
    records: impl IntoIterator<Item = (&'a Uuid, &'a T)>,
    name_of: impl Fn(&T) -> &str,
    name: &str,
    except: Option<Uuid>,
) -> bool {
    records
        .into_iter()
        .any(|(id, record)| Some(*id) != except && name_of(record) == name)
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>, Error> {
        let data = self.data.read().await;
        let mut notes: Vec<Note> = data
            .notes
            .values()
            .filter(|note| filter.matches(note))
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(notes)
    }

    async fn get_note(&self, id: Uuid) -> Result<Option<Note>, Error> {
        Ok(self.data.read().await.notes.get(&id).cloned())
    }

    async fn add_note(&self, note: NewNote) -> Result<Note, Error> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: note.title,
            content: note.content,
            folder_id: note.folder_id,
            tags: note.tags,
            created_at: now,
            updated_at: now,
        };
        self.data.write().await.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: Uuid, patch: NotePatch) -> Result<Option<Note>, Error> {
        let mut data = self.data.write().await;
        let note = match data.notes.get_mut(&id) {
            Some(note) => note,
            None => return Ok(None),
        };
        if let Some(title) = patch.title {
            note.title = title;
        }
        note.content = patch.content.apply(note.content.take());
        note.folder_id = patch.folder_id.apply(note.folder_id.take());
        if let Some(tags) = patch.tags {
            note.tags = tags;
        }
        note.updated_at = Utc::now();
        Ok(Some(note.clone()))
    }

    async fn delete_note(&self, id: Uuid) -> Result<bool, Error> {
        Ok(self.data.write().await.notes.remove(&id).is_some())
    }

    async fn list_folders(&self) -> Result<Vec<Folder>, Error> {
        let mut folders: Vec<Folder> = self.data.read().await.folders.values().cloned().collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    async fn get_folder(&self, id: Uuid) -> Result<Option<Folder>, Error> {
        Ok(self.data.read().await.folders.get(&id).cloned())
    }

    async fn add_folder(&self, folder: NewFolder) -> Result<Folder, Error> {
        let mut data = self.data.write().await;
        if name_taken(&data.folders, |f| f.name.as_str(), &folder.name, None) {
            return Err(Error::Conflict("folder"));
        }
        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            name: folder.name,
            created_at: now,
            updated_at: now,
        };
        data.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn update_folder(&self, id: Uuid, patch: FolderPatch) -> Result<Option<Folder>, Error> {
        let mut data = self.data.write().await;
        if !data.folders.contains_key(&id) {
            return Ok(None);
        }
        if let Some(name) = &patch.name {
            if name_taken(&data.folders, |f| f.name.as_str(), name, Some(id)) {
                return Err(Error::Conflict("folder"));
            }
        }
        let folder = match data.folders.get_mut(&id) {
            Some(folder) => folder,
            None => return Ok(None),
        };
        if let Some(name) = patch.name {
            folder.name = name;
        }
        folder.updated_at = Utc::now();
        Ok(Some(folder.clone()))
    }

    async fn delete_folder(&self, id: Uuid) -> Result<u64, Error> {
        let mut data = self.data.write().await;
        let before = data.notes.len();
        data.notes.retain(|_, note| note.folder_id != Some(id));
        let removed = (before - data.notes.len()) as u64;
        data.folders.remove(&id);
        Ok(removed)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        let mut tags: Vec<Tag> = self.data.read().await.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn get_tag(&self, id: Uuid) -> Result<Option<Tag>, Error> {
        Ok(self.data.read().await.tags.get(&id).cloned())
    }

    async fn add_tag(&self, tag: NewTag) -> Result<Tag, Error> {
        let mut data = self.data.write().await;
        if name_taken(&data.tags, |t| t.name.as_str(), &tag.name, None) {
            return Err(Error::Conflict("tag"));
        }
        let now = Utc::now();
        let tag = Tag {
            id: Uuid::new_v4(),
            name: tag.name,
            created_at: now,
            updated_at: now,
        };
        data.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn update_tag(&self, id: Uuid, tag: NewTag) -> Result<Option<Tag>, Error> {
        let mut data = self.data.write().await;
        if !data.tags.contains_key(&id) {
            return Ok(None);
        }
        if name_taken(&data.tags, |t| t.name.as_str(), &tag.name, Some(id)) {
            return Err(Error::Conflict("tag"));
        }
        let stored = match data.tags.get_mut(&id) {
            Some(stored) => stored,
            None => return Ok(None),
        };
        stored.name = tag.name;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete_tag(&self, id: Uuid) -> Result<u64, Error> {
        let mut data = self.data.write().await;
        let now = Utc::now();
        let mut touched = 0;
        for note in data.notes.values_mut() {
            if note.tags.contains(&id) {
                note.tags.retain(|tag| *tag != id);
                note.updated_at = now;
                touched += 1;
            }
        }
        data.tags.remove(&id);
        Ok(touched)
    }

    async fn folder_exists(&self, id: Uuid) -> Result<bool, Error> {
        Ok(self.data.read().await.folders.contains_key(&id))
    }

    async fn missing_tags(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, Error> {
        let data = self.data.read().await;
        Ok(ids
            .iter()
            .filter(|id| !data.tags.contains_key(*id))
            .copied()
            .collect())
    }

    async fn seed(&self, seed: SeedData) -> Result<(), Error> {
        // Built aside and swapped in whole, so a rejected seed leaves the
        // current data untouched.
        let mut fresh = Collections::default();
        for folder in seed.folders {
            if name_taken(&fresh.folders, |f| f.name.as_str(), &folder.name, None) {
                return Err(Error::Conflict("folder"));
            }
            fresh.folders.insert(folder.id, folder);
        }
        for tag in seed.tags {
            if name_taken(&fresh.tags, |t| t.name.as_str(), &tag.name, None) {
                return Err(Error::Conflict("tag"));
            }
            fresh.tags.insert(tag.id, tag);
        }
        for note in seed.notes {
            fresh.notes.insert(note.id, note);
        }
        *self.data.write().await = fresh;
        Ok(())
    }

    async fn close(&self) {}
}
