use crate::store::Backend;
use crate::types::folder::{Folder, FolderPatch, NewFolder};
use crate::types::note::{NewNote, Note, NoteFilter, NotePatch};
use crate::types::seed::SeedData;
use crate::types::tag::{NewTag, Tag};
use async_trait::async_trait;
use chrono::Utc;
use handle_errors::Error;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;
use tracing::{error, instrument};
use uuid::Uuid;

const NOTE_COLUMNS: &str = "id, title, content, folder_id, tags, created_at, updated_at";

#[derive(Clone)]
pub struct PgBackend {
    pub connection: PgPool,
}

fn note_from_row(row: PgRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        folder_id: row.get("folder_id"),
        tags: row.get("tags"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn folder_from_row(row: PgRow) -> Folder {
    Folder {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn tag_from_row(row: PgRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// `%term%` for ILIKE, with the pattern metacharacters escaped so the term
/// matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl PgBackend {
    pub async fn new(
        db_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, Error> {
        let db_pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(db_url)
            .await
            .map_err(|e| {
                error!("cannot connect to database: {}", e);
                Error::DatabaseQueryError(e)
            })?;
        Ok(PgBackend {
            connection: db_pool,
        })
    }

    pub async fn migrate(&self) -> Result<(), Error> {
        sqlx::migrate!("./migrations").run(&self.connection).await?;
        Ok(())
    }
}

#[async_trait]
impl Backend for PgBackend {
    #[instrument(skip(self))]
    async fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>, Error> {
        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM notes
            WHERE ($1::text IS NULL OR title ILIKE $1 OR content ILIKE $1)
              AND ($2::uuid IS NULL OR folder_id = $2)
              AND ($3::uuid IS NULL OR $3 = ANY(tags))
            ORDER BY updated_at DESC, id"
        );
        sqlx::query(&query)
            .bind(filter.search_term.as_deref().map(like_pattern))
            .bind(filter.folder_id)
            .bind(filter.tag_id)
            .map(note_from_row)
            .fetch_all(&self.connection)
            .await
            .map_err(Error::DatabaseQueryError)
    }

    async fn get_note(&self, id: Uuid) -> Result<Option<Note>, Error> {
        sqlx::query(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1"))
            .bind(id)
            .map(note_from_row)
            .fetch_optional(&self.connection)
            .await
            .map_err(Error::DatabaseQueryError)
    }

    #[instrument(skip(self))]
    async fn add_note(&self, note: NewNote) -> Result<Note, Error> {
        let now = Utc::now();
        sqlx::query(&format!(
            "INSERT INTO notes ({NOTE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {NOTE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(note.title)
        .bind(note.content)
        .bind(note.folder_id)
        .bind(note.tags)
        .bind(now)
        .map(note_from_row)
        .fetch_one(&self.connection)
        .await
        .map_err(Error::DatabaseQueryError)
    }

    #[instrument(skip(self))]
    async fn update_note(&self, id: Uuid, patch: NotePatch) -> Result<Option<Note>, Error> {
        sqlx::query(&format!(
            "UPDATE notes SET
                title = COALESCE($2, title),
                content = CASE WHEN $3 THEN $4::text ELSE content END,
                folder_id = CASE WHEN $5 THEN $6::uuid ELSE folder_id END,
                tags = COALESCE($7::uuid[], tags),
                updated_at = $8
            WHERE id = $1
            RETURNING {NOTE_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(!patch.content.is_keep())
        .bind(patch.content.value().map(String::as_str))
        .bind(!patch.folder_id.is_keep())
        .bind(patch.folder_id.value().copied())
        .bind(patch.tags.as_deref())
        .bind(Utc::now())
        .map(note_from_row)
        .fetch_optional(&self.connection)
        .await
        .map_err(Error::DatabaseQueryError)
    }

    async fn delete_note(&self, id: Uuid) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.connection)
            .await
            .map_err(Error::DatabaseQueryError)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_folders(&self) -> Result<Vec<Folder>, Error> {
        sqlx::query("SELECT id, name, created_at, updated_at FROM folders ORDER BY name ASC")
            .map(folder_from_row)
            .fetch_all(&self.connection)
            .await
            .map_err(Error::DatabaseQueryError)
    }

    async fn get_folder(&self, id: Uuid) -> Result<Option<Folder>, Error> {
        sqlx::query("SELECT id, name, created_at, updated_at FROM folders WHERE id = $1")
            .bind(id)
            .map(folder_from_row)
            .fetch_optional(&self.connection)
            .await
            .map_err(Error::DatabaseQueryError)
    }

    #[instrument(skip(self))]
    async fn add_folder(&self, folder: NewFolder) -> Result<Folder, Error> {
        sqlx::query(
            "INSERT INTO folders (id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, name, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(folder.name)
        .bind(Utc::now())
        .map(folder_from_row)
        .fetch_one(&self.connection)
        .await
        .map_err(|e| Error::from_write(e, "folder"))
    }

    #[instrument(skip(self))]
    async fn update_folder(&self, id: Uuid, patch: FolderPatch) -> Result<Option<Folder>, Error> {
        sqlx::query(
            "UPDATE folders SET name = COALESCE($2, name), updated_at = $3
            WHERE id = $1
            RETURNING id, name, created_at, updated_at",
        )
        .bind(id)
        .bind(patch.name)
        .bind(Utc::now())
        .map(folder_from_row)
        .fetch_optional(&self.connection)
        .await
        .map_err(|e| Error::from_write(e, "folder"))
    }

    #[instrument(skip(self))]
    async fn delete_folder(&self, id: Uuid) -> Result<u64, Error> {
        let mut tx = self
            .connection
            .begin()
            .await
            .map_err(Error::DatabaseQueryError)?;
        let removed = sqlx::query("DELETE FROM notes WHERE folder_id = $1")
            .bind(id)
            .execute(&mut tx)
            .await
            .map_err(Error::DatabaseQueryError)?
            .rows_affected();
        sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&mut tx)
            .await
            .map_err(Error::DatabaseQueryError)?;
        tx.commit().await.map_err(Error::DatabaseQueryError)?;
        Ok(removed)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        sqlx::query("SELECT id, name, created_at, updated_at FROM tags ORDER BY name ASC")
            .map(tag_from_row)
            .fetch_all(&self.connection)
            .await
            .map_err(Error::DatabaseQueryError)
    }

    async fn get_tag(&self, id: Uuid) -> Result<Option<Tag>, Error> {
        sqlx::query("SELECT id, name, created_at, updated_at FROM tags WHERE id = $1")
            .bind(id)
            .map(tag_from_row)
            .fetch_optional(&self.connection)
            .await
            .map_err(Error::DatabaseQueryError)
    }

    #[instrument(skip(self))]
    async fn add_tag(&self, tag: NewTag) -> Result<Tag, Error> {
        sqlx::query(
            "INSERT INTO tags (id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, name, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(tag.name)
        .bind(Utc::now())
        .map(tag_from_row)
        .fetch_one(&self.connection)
        .await
        .map_err(|e| Error::from_write(e, "tag"))
    }

    #[instrument(skip(self))]
    async fn update_tag(&self, id: Uuid, tag: NewTag) -> Result<Option<Tag>, Error> {
        sqlx::query(
            "UPDATE tags SET name = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, name, created_at, updated_at",
        )
        .bind(id)
        .bind(tag.name)
        .bind(Utc::now())
        .map(tag_from_row)
        .fetch_optional(&self.connection)
        .await
        .map_err(|e| Error::from_write(e, "tag"))
    }

    #[instrument(skip(self))]
    async fn delete_tag(&self, id: Uuid) -> Result<u64, Error> {
        let mut tx = self
            .connection
            .begin()
            .await
            .map_err(Error::DatabaseQueryError)?;
        let touched = sqlx::query(
            "UPDATE notes SET tags = array_remove(tags, $1), updated_at = $2
            WHERE $1 = ANY(tags)",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&mut tx)
        .await
        .map_err(Error::DatabaseQueryError)?
        .rows_affected();
        sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&mut tx)
            .await
            .map_err(Error::DatabaseQueryError)?;
        tx.commit().await.map_err(Error::DatabaseQueryError)?;
        Ok(touched)
    }

    async fn folder_exists(&self, id: Uuid) -> Result<bool, Error> {
        sqlx::query("SELECT EXISTS(SELECT 1 FROM folders WHERE id = $1) AS found")
            .bind(id)
            .map(|row: PgRow| row.get::<bool, _>("found"))
            .fetch_one(&self.connection)
            .await
            .map_err(Error::DatabaseQueryError)
    }

    async fn missing_tags(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, Error> {
        let found: Vec<Uuid> = sqlx::query("SELECT id FROM tags WHERE id = ANY($1)")
            .bind(ids)
            .map(|row: PgRow| row.get::<Uuid, _>("id"))
            .fetch_all(&self.connection)
            .await
            .map_err(Error::DatabaseQueryError)?;
        Ok(ids.iter().filter(|id| !found.contains(*id)).copied().collect())
    }

    #[instrument(skip(self, data))]
    async fn seed(&self, data: SeedData) -> Result<(), Error> {
        let mut tx = self
            .connection
            .begin()
            .await
            .map_err(Error::DatabaseQueryError)?;
        sqlx::query("TRUNCATE notes, folders, tags")
            .execute(&mut tx)
            .await
            .map_err(Error::DatabaseQueryError)?;
        for folder in data.folders {
            sqlx::query(
                "INSERT INTO folders (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)",
            )
            .bind(folder.id)
            .bind(folder.name)
            .bind(folder.created_at)
            .bind(folder.updated_at)
            .execute(&mut tx)
            .await
            .map_err(|e| Error::from_write(e, "folder"))?;
        }
        for tag in data.tags {
            sqlx::query("INSERT INTO tags (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)")
                .bind(tag.id)
                .bind(tag.name)
                .bind(tag.created_at)
                .bind(tag.updated_at)
                .execute(&mut tx)
                .await
                .map_err(|e| Error::from_write(e, "tag"))?;
        }
        for note in data.notes {
            sqlx::query(&format!(
                "INSERT INTO notes ({NOTE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)"
            ))
            .bind(note.id)
            .bind(note.title)
            .bind(note.content)
            .bind(note.folder_id)
            .bind(note.tags)
            .bind(note.created_at)
            .bind(note.updated_at)
            .execute(&mut tx)
            .await
            .map_err(Error::DatabaseQueryError)?;
        }
        tx.commit().await.map_err(Error::DatabaseQueryError)?;
        Ok(())
    }

    async fn close(&self) {
        self.connection.close().await;
    }
}
