use crate::routes::{created, no_content};
use crate::store::Store;
use crate::types::folder::FolderRequest;
use crate::types::id::parse_id;
use handle_errors::Error;
use tracing::info;
use warp::filters::path::FullPath;

pub async fn get_folders(store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let folders = store.list_folders().await?;
    Ok(warp::reply::json(&folders))
}

pub async fn get_folder(id: String, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let id = parse_id(&id, "id")?;
    match store.get_folder(id).await? {
        Some(folder) => Ok(warp::reply::json(&folder)),
        None => Err(warp::reject::custom(Error::NotFound)),
    }
}

pub async fn add_folder(
    path: FullPath,
    store: Store,
    request: FolderRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let folder = store.add_folder(request.into_new()?).await?;
    info!("folder created: {}", folder.id);
    Ok(created(&path, folder.id, &folder))
}

pub async fn update_folder(
    id: String,
    store: Store,
    request: FolderRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let id = parse_id(&id, "id")?;
    let patch = request.into_patch()?;
    match store.update_folder(id, patch).await? {
        Some(folder) => {
            info!("folder updated: {}", folder.id);
            Ok(warp::reply::json(&folder))
        }
        None => Err(warp::reject::custom(Error::NotFound)),
    }
}

/// Removes the folder's notes and then the folder. Succeeds whether or not
/// the folder still exists.
pub async fn delete_folder(id: String, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let id = parse_id(&id, "id")?;
    let removed = store.delete_folder(id).await?;
    info!("folder deleted: {} ({} notes removed)", id, removed);
    Ok(no_content())
}
