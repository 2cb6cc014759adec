use crate::routes::{created, no_content};
use crate::store::Store;
use crate::types::id::parse_id;
use crate::types::note::{NoteQuery, NoteRequest};
use handle_errors::Error;
use tracing::info;
use uuid::Uuid;
use warp::filters::path::FullPath;

/// Awaited existence checks for the folder and tags a note points at.
async fn check_references(
    store: &Store,
    folder_id: Option<Uuid>,
    tags: Option<&[Uuid]>,
) -> Result<(), Error> {
    let folder = async {
        match folder_id {
            Some(id) => store.folder_exists(id).await,
            None => Ok(true),
        }
    };
    let tags = async {
        match tags {
            Some(tags) if !tags.is_empty() => store.missing_tags(tags).await,
            _ => Ok(Vec::new()),
        }
    };
    let (folder_found, missing_tags) = futures::try_join!(folder, tags)?;
    if !folder_found {
        return Err(Error::MissingReference("folderId"));
    }
    if !missing_tags.is_empty() {
        return Err(Error::MissingReference("tags"));
    }
    Ok(())
}

pub async fn get_notes(
    query: NoteQuery,
    store: Store,
) -> Result<impl warp::Reply, warp::Rejection> {
    let filter = query.into_filter()?;
    let notes = store.list_notes(&filter).await?;
    Ok(warp::reply::json(&notes))
}

pub async fn get_note(id: String, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let id = parse_id(&id, "id")?;
    match store.get_note(id).await? {
        Some(note) => Ok(warp::reply::json(&note)),
        None => Err(warp::reject::custom(Error::NotFound)),
    }
}

pub async fn add_note(
    path: FullPath,
    store: Store,
    request: NoteRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let new = request.into_new()?;
    check_references(&store, new.folder_id, Some(new.tags.as_slice())).await?;
    let note = store.add_note(new).await?;
    info!("note created: {}", note.id);
    Ok(created(&path, note.id, &note))
}

pub async fn update_note(
    id: String,
    store: Store,
    request: NoteRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let id = parse_id(&id, "id")?;
    let patch = request.into_patch()?;
    let current = match store.get_note(id).await? {
        Some(note) => note,
        None => return Err(warp::reject::custom(Error::NotFound)),
    };
    if patch.is_empty() {
        return Ok(warp::reply::json(&current));
    }
    check_references(&store, patch.folder_id.value().copied(), patch.tags.as_deref()).await?;
    match store.update_note(id, patch).await? {
        Some(note) => {
            info!("note updated: {}", note.id);
            Ok(warp::reply::json(&note))
        }
        None => Err(warp::reject::custom(Error::NotFound)),
    }
}

pub async fn delete_note(id: String, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let id = parse_id(&id, "id")?;
    if store.delete_note(id).await? {
        info!("note deleted: {}", id);
        Ok(no_content())
    } else {
        Err(warp::reject::custom(Error::NotFound))
    }
}
