mod memory;
mod postgres;

pub use memory::MemoryBackend;
pub use postgres::PgBackend;

use crate::config::{Args, StoreKind};
use crate::types::folder::{Folder, FolderPatch, NewFolder};
use crate::types::note::{NewNote, Note, NoteFilter, NotePatch};
use crate::types::seed::SeedData;
use crate::types::tag::{NewTag, Tag};
use async_trait::async_trait;
use handle_errors::Error;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Persistence operations the route handlers rely on.
///
/// Lookups return `Ok(None)` for absent records; handlers decide whether that
/// is a not-found. Writes to collections with a unique name report duplicates
/// as `Error::Conflict`.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>, Error>;
    async fn get_note(&self, id: Uuid) -> Result<Option<Note>, Error>;
    async fn add_note(&self, note: NewNote) -> Result<Note, Error>;
    async fn update_note(&self, id: Uuid, patch: NotePatch) -> Result<Option<Note>, Error>;
    /// Returns whether a note was removed.
    async fn delete_note(&self, id: Uuid) -> Result<bool, Error>;

    async fn list_folders(&self) -> Result<Vec<Folder>, Error>;
    async fn get_folder(&self, id: Uuid) -> Result<Option<Folder>, Error>;
    async fn add_folder(&self, folder: NewFolder) -> Result<Folder, Error>;
    async fn update_folder(&self, id: Uuid, patch: FolderPatch) -> Result<Option<Folder>, Error>;
    /// Deletes every note filed under the folder, then the folder itself, as
    /// one unit of work. Returns the number of notes removed.
    async fn delete_folder(&self, id: Uuid) -> Result<u64, Error>;

    async fn list_tags(&self) -> Result<Vec<Tag>, Error>;
    async fn get_tag(&self, id: Uuid) -> Result<Option<Tag>, Error>;
    async fn add_tag(&self, tag: NewTag) -> Result<Tag, Error>;
    async fn update_tag(&self, id: Uuid, tag: NewTag) -> Result<Option<Tag>, Error>;
    /// Pulls the tag out of every note, then deletes it, as one unit of work.
    /// Returns the number of notes that referenced it.
    async fn delete_tag(&self, id: Uuid) -> Result<u64, Error>;

    async fn folder_exists(&self, id: Uuid) -> Result<bool, Error>;
    /// The subset of `ids` with no matching tag.
    async fn missing_tags(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, Error>;

    /// Empties all collections and loads `data`.
    async fn seed(&self, data: SeedData) -> Result<(), Error>;
    async fn close(&self);
}

/// Shared handle to the configured backend. Every call is bounded by the
/// request timeout.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn Backend>,
    timeout: Duration,
}

impl Store {
    pub fn new(backend: impl Backend + 'static, timeout: Duration) -> Self {
        Store {
            backend: Arc::new(backend),
            timeout,
        }
    }

    /// An empty in-memory store.
    pub fn memory(timeout: Duration) -> Self {
        Store::new(MemoryBackend::default(), timeout)
    }

    /// Opens the backend selected in the configuration. Postgres connections
    /// are migrated before the store is handed out.
    pub async fn connect(config: &Args) -> Result<Self, Error> {
        let timeout = config.request_timeout();
        match config.store {
            StoreKind::Memory => {
                info!("using in-memory store");
                Ok(Store::memory(timeout))
            }
            StoreKind::Postgres => {
                let backend =
                    PgBackend::new(&config.database_url(), config.max_connections, timeout).await?;
                backend.migrate().await?;
                info!("connected to postgres at {}", config.database_host);
                Ok(Store::new(backend, timeout))
            }
        }
    }

    async fn run<T>(&self, fut: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout),
        }
    }

    pub async fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>, Error> {
        self.run(self.backend.list_notes(filter)).await
    }

    pub async fn get_note(&self, id: Uuid) -> Result<Option<Note>, Error> {
        self.run(self.backend.get_note(id)).await
    }

    pub async fn add_note(&self, note: NewNote) -> Result<Note, Error> {
        self.run(self.backend.add_note(note)).await
    }

    pub async fn update_note(&self, id: Uuid, patch: NotePatch) -> Result<Option<Note>, Error> {
        self.run(self.backend.update_note(id, patch)).await
    }

    pub async fn delete_note(&self, id: Uuid) -> Result<bool, Error> {
        self.run(self.backend.delete_note(id)).await
    }

    pub async fn list_folders(&self) -> Result<Vec<Folder>, Error> {
        self.run(self.backend.list_folders()).await
    }

    pub async fn get_folder(&self, id: Uuid) -> Result<Option<Folder>, Error> {
        self.run(self.backend.get_folder(id)).await
    }

    pub async fn add_folder(&self, folder: NewFolder) -> Result<Folder, Error> {
        self.run(self.backend.add_folder(folder)).await
    }

    pub async fn update_folder(&self, id: Uuid, patch: FolderPatch) -> Result<Option<Folder>, Error> {
        self.run(self.backend.update_folder(id, patch)).await
    }

    pub async fn delete_folder(&self, id: Uuid) -> Result<u64, Error> {
        self.run(self.backend.delete_folder(id)).await
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        self.run(self.backend.list_tags()).await
    }

    pub async fn get_tag(&self, id: Uuid) -> Result<Option<Tag>, Error> {
        self.run(self.backend.get_tag(id)).await
    }

    pub async fn add_tag(&self, tag: NewTag) -> Result<Tag, Error> {
        self.run(self.backend.add_tag(tag)).await
    }

    pub async fn update_tag(&self, id: Uuid, tag: NewTag) -> Result<Option<Tag>, Error> {
        self.run(self.backend.update_tag(id, tag)).await
    }

    pub async fn delete_tag(&self, id: Uuid) -> Result<u64, Error> {
        self.run(self.backend.delete_tag(id)).await
    }

    pub async fn folder_exists(&self, id: Uuid) -> Result<bool, Error> {
        self.run(self.backend.folder_exists(id)).await
    }

    pub async fn missing_tags(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, Error> {
        self.run(self.backend.missing_tags(ids)).await
    }

    pub async fn seed(&self, data: SeedData) -> Result<(), Error> {
        self.run(self.backend.seed(data)).await
    }

    pub async fn close(&self) {
        self.backend.close().await
    }
}
