pub mod folders;
pub mod notes;
pub mod tags;

use crate::store::Store;
use handle_errors::return_error;
use serde::Serialize;
use uuid::Uuid;
use warp::filters::path::FullPath;
use warp::http::{header::LOCATION, Method, StatusCode};
use warp::{Filter, Rejection, Reply};

/// 201 with the created record and a `Location` pointing at it.
pub(crate) fn created<T: Serialize>(path: &FullPath, id: Uuid, body: &T) -> impl Reply {
    let location = format!("{}/{}", path.as_str().trim_end_matches('/'), id);
    warp::reply::with_header(
        warp::reply::with_status(warp::reply::json(body), StatusCode::CREATED),
        LOCATION,
        location,
    )
}

pub(crate) fn no_content() -> impl Reply {
    warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT)
}

/// The full API: notes, folders and tags, served both at the root and under
/// `/api`, with request tracing, CORS and error recovery.
pub fn build(store: Store) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let store_filter = warp::any().map(move || store.clone());

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("Content-Type")
        .allow_methods(&[Method::PUT, Method::DELETE, Method::GET, Method::POST]);

    let get_notes = warp::get()
        .and(warp::path("notes"))
        .and(warp::path::end())
        .and(warp::query::<crate::types::note::NoteQuery>())
        .and(store_filter.clone())
        .and_then(notes::get_notes);

    let get_note = warp::get()
        .and(warp::path("notes"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(store_filter.clone())
        .and_then(notes::get_note);

    let add_note = warp::post()
        .and(warp::path("notes"))
        .and(warp::path::end())
        .and(warp::path::full())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(notes::add_note);

    let update_note = warp::put()
        .and(warp::path("notes"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(notes::update_note);

    let delete_note = warp::delete()
        .and(warp::path("notes"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(store_filter.clone())
        .and_then(notes::delete_note);

    let get_folders = warp::get()
        .and(warp::path("folders"))
        .and(warp::path::end())
        .and(store_filter.clone())
        .and_then(folders::get_folders);

    let get_folder = warp::get()
        .and(warp::path("folders"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(store_filter.clone())
        .and_then(folders::get_folder);

    let add_folder = warp::post()
        .and(warp::path("folders"))
        .and(warp::path::end())
        .and(warp::path::full())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(folders::add_folder);

    let update_folder = warp::put()
        .and(warp::path("folders"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(folders::update_folder);

    let delete_folder = warp::delete()
        .and(warp::path("folders"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(store_filter.clone())
        .and_then(folders::delete_folder);

    let get_tags = warp::get()
        .and(warp::path("tags"))
        .and(warp::path::end())
        .and(store_filter.clone())
        .and_then(tags::get_tags);

    let get_tag = warp::get()
        .and(warp::path("tags"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(store_filter.clone())
        .and_then(tags::get_tag);

    let add_tag = warp::post()
        .and(warp::path("tags"))
        .and(warp::path::end())
        .and(warp::path::full())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(tags::add_tag);

    let update_tag = warp::put()
        .and(warp::path("tags"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(store_filter.clone())
        .and(warp::body::json())
        .and_then(tags::update_tag);

    let delete_tag = warp::delete()
        .and(warp::path("tags"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(store_filter)
        .and_then(tags::delete_tag);

    let api = get_notes
        .or(get_note)
        .or(add_note)
        .or(update_note)
        .or(delete_note)
        .or(get_folders)
        .or(get_folder)
        .or(add_folder)
        .or(update_folder)
        .or(delete_folder)
        .or(get_tags)
        .or(get_tag)
        .or(add_tag)
        .or(update_tag)
        .or(delete_tag);

    warp::path("api")
        .and(api.clone())
        .or(api)
        .with(warp::trace::request())
        .with(cors)
        .recover(return_error)
}
