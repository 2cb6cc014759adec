use crate::routes::{created, no_content};
use crate::store::Store;
use crate::types::id::parse_id;
use crate::types::tag::TagRequest;
use handle_errors::Error;
use tracing::info;
use warp::filters::path::FullPath;

pub async fn get_tags(store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let tags = store.list_tags().await?;
    Ok(warp::reply::json(&tags))
}

pub async fn get_tag(id: String, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let id = parse_id(&id, "id")?;
    match store.get_tag(id).await? {
        Some(tag) => Ok(warp::reply::json(&tag)),
        None => Err(warp::reject::custom(Error::NotFound)),
    }
}

pub async fn add_tag(
    path: FullPath,
    store: Store,
    request: TagRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let tag = store.add_tag(request.into_new()?).await?;
    info!("tag created: {}", tag.id);
    Ok(created(&path, tag.id, &tag))
}

pub async fn update_tag(
    id: String,
    store: Store,
    request: TagRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let id = parse_id(&id, "id")?;
    let tag = request.into_new()?;
    match store.update_tag(id, tag).await? {
        Some(tag) => {
            info!("tag updated: {}", tag.id);
            Ok(warp::reply::json(&tag))
        }
        None => Err(warp::reject::custom(Error::NotFound)),
    }
}

/// Pulls the tag out of every note, then deletes it. Notes are kept.
pub async fn delete_tag(id: String, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let id = parse_id(&id, "id")?;
    let touched = store.delete_tag(id).await?;
    info!("tag deleted: {} (pulled from {} notes)", id, touched);
    Ok(no_content())
}
