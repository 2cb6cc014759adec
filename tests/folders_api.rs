mod helpers;

use helpers::*;
use serde_json::json;
use warp::http::StatusCode;

#[tokio::test]
async fn folders_are_listed_by_name() {
    let store = seeded_store().await;
    let res = get(&store, "/folders").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.ids(), ids(&[ARCHIVE, DRAFTS, PERSONAL]));
}

#[tokio::test]
async fn folder_is_fetched_by_id() {
    let store = seeded_store().await;
    let res = get(&store, &format!("/folders/{}", DRAFTS)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["name"], "Drafts");

    assert_eq!(
        get(&store, &format!("/folders/{}", UNKNOWN)).await.status,
        StatusCode::NOT_FOUND
    );
    let res = get(&store, "/folders/12345").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.text(), "Invalid `id`");
}

#[tokio::test]
async fn created_folder_has_location_and_is_listed() {
    let store = seeded_store().await;
    let res = call(&store, "POST", "/folders", Some(json!({ "name": "Books" }))).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.json()["id"].as_str().unwrap().to_string();
    assert_eq!(res.location, Some(format!("/folders/{}", id)));

    let names: Vec<String> = get(&store, "/folders")
        .await
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Archive", "Books", "Drafts", "Personal"]);
}

#[tokio::test]
async fn duplicate_folder_name_is_a_conflict() {
    let store = seeded_store().await;
    let res = call(&store, "POST", "/folders", Some(json!({ "name": "Archive" }))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.text(), "The folder name already exists");
    assert_eq!(get(&store, "/folders").await.ids().len(), 3);
}

#[tokio::test]
async fn folder_name_is_required() {
    let store = seeded_store().await;
    let res = call(&store, "POST", "/folders", Some(json!({}))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.text(), "Missing `name` in request body");
}

#[tokio::test]
async fn folder_is_renamed() {
    let store = seeded_store().await;
    let path = format!("/folders/{}", PERSONAL);
    let res = call(&store, "PUT", &path, Some(json!({ "name": "Private" }))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["name"], "Private");
    assert_eq!(get(&store, &path).await.json()["name"], "Private");
}

#[tokio::test]
async fn rename_to_existing_name_is_a_conflict() {
    let store = seeded_store().await;
    let path = format!("/folders/{}", PERSONAL);
    let res = call(&store, "PUT", &path, Some(json!({ "name": "Drafts" }))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.text(), "The folder name already exists");
    assert_eq!(get(&store, &path).await.json()["name"], "Personal");

    let res = call(&store, "PUT", &path, Some(json!({ "name": "Personal" }))).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn update_of_unknown_folder_is_not_found() {
    let store = seeded_store().await;
    let res = call(
        &store,
        "PUT",
        &format!("/folders/{}", UNKNOWN),
        Some(json!({ "name": "Ghost" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = call(
        &store,
        "PUT",
        &format!("/folders/{}", UNKNOWN),
        Some(json!({ "name": "Drafts" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_malformed_folder_id_is_rejected() {
    let store = seeded_store().await;
    let res = call(&store, "PUT", "/folders/12345", Some(json!({ "name": "Ghost" }))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.text(), "Invalid `id`");
}

#[tokio::test]
async fn rejected_seed_keeps_existing_data() {
    let store = seeded_store().await;
    let mut data = seed_data();
    let mut twin = data.folders[0].clone();
    twin.id = UNKNOWN;
    data.folders.push(twin);
    data.notes.clear();

    assert!(store.seed(data).await.is_err());
    assert_eq!(get(&store, "/folders").await.ids(), ids(&[ARCHIVE, DRAFTS, PERSONAL]));
    assert_eq!(get(&store, "/notes").await.ids().len(), 4);
}

#[tokio::test]
async fn deleting_a_folder_deletes_its_notes() {
    let store = seeded_store().await;
    let res = call(&store, "DELETE", &format!("/folders/{}", ARCHIVE), None).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    assert_eq!(
        get(&store, &format!("/folders/{}", ARCHIVE)).await.status,
        StatusCode::NOT_FOUND
    );
    for gone in [CATS, BORING] {
        assert_eq!(
            get(&store, &format!("/notes/{}", gone)).await.status,
            StatusCode::NOT_FOUND
        );
    }
    assert_eq!(get(&store, "/notes").await.ids(), ids(&[GAGA, GOVERNMENT]));
}

#[tokio::test]
async fn folder_delete_is_idempotent() {
    let store = seeded_store().await;
    let path = format!("/folders/{}", DRAFTS);
    assert_eq!(call(&store, "DELETE", &path, None).await.status, StatusCode::NO_CONTENT);
    assert_eq!(call(&store, "DELETE", &path, None).await.status, StatusCode::NO_CONTENT);
    assert_eq!(
        call(&store, "DELETE", "/folders/oops", None).await.status,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(get(&store, "/notes").await.ids().len(), 3);
}
