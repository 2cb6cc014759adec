#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use noteful::routes;
use noteful::store::Store;
use noteful::types::folder::Folder;
use noteful::types::note::Note;
use noteful::types::seed::SeedData;
use noteful::types::tag::Tag;
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;
use warp::http::StatusCode;

pub const ARCHIVE: Uuid = Uuid::from_u128(0x1111_0000_0000_0000_0000_0000_0000_0001);
pub const DRAFTS: Uuid = Uuid::from_u128(0x1111_0000_0000_0000_0000_0000_0000_0002);
pub const PERSONAL: Uuid = Uuid::from_u128(0x1111_0000_0000_0000_0000_0000_0000_0003);

pub const FOO: Uuid = Uuid::from_u128(0x2222_0000_0000_0000_0000_0000_0000_0001);
pub const BAR: Uuid = Uuid::from_u128(0x2222_0000_0000_0000_0000_0000_0000_0002);
pub const BAZ: Uuid = Uuid::from_u128(0x2222_0000_0000_0000_0000_0000_0000_0003);

/// Archive, tagged foo + bar, content mentions gaga.
pub const CATS: Uuid = Uuid::from_u128(0x3333_0000_0000_0000_0000_0000_0000_0001);
/// Drafts, tagged bar.
pub const GOVERNMENT: Uuid = Uuid::from_u128(0x3333_0000_0000_0000_0000_0000_0000_0002);
/// Archive, untagged.
pub const BORING: Uuid = Uuid::from_u128(0x3333_0000_0000_0000_0000_0000_0000_0003);
/// No folder, tagged baz, title mentions Gaga.
pub const GAGA: Uuid = Uuid::from_u128(0x3333_0000_0000_0000_0000_0000_0000_0004);

/// A well-formed id that is never seeded.
pub const UNKNOWN: Uuid = Uuid::from_u128(0x9999_0000_0000_0000_0000_0000_0000_0009);

pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
}

fn folder(id: Uuid, name: &str) -> Folder {
    Folder {
        id,
        name: name.to_string(),
        created_at: day(1),
        updated_at: day(1),
    }
}

fn tag(id: Uuid, name: &str) -> Tag {
    Tag {
        id,
        name: name.to_string(),
        created_at: day(1),
        updated_at: day(1),
    }
}

fn note(
    id: Uuid,
    title: &str,
    content: &str,
    folder_id: Option<Uuid>,
    tags: Vec<Uuid>,
    updated: u32,
) -> Note {
    Note {
        id,
        title: title.to_string(),
        content: Some(content.to_string()),
        folder_id,
        tags,
        created_at: day(1),
        updated_at: day(updated),
    }
}

pub fn seed_data() -> SeedData {
    SeedData {
        folders: vec![
            folder(PERSONAL, "Personal"),
            folder(ARCHIVE, "Archive"),
            folder(DRAFTS, "Drafts"),
        ],
        tags: vec![tag(FOO, "foo"), tag(BAZ, "baz"), tag(BAR, "bar")],
        notes: vec![
            note(
                CATS,
                "5 life lessons learned from cats",
                "Lorem ipsum dolor sit amet, GaGa consectetur",
                Some(ARCHIVE),
                vec![FOO, BAR],
                1,
            ),
            note(
                GOVERNMENT,
                "What the government doesn't want you to know about cats",
                "Posuere sollicitudin aliquam ultrices sagittis",
                Some(DRAFTS),
                vec![BAR],
                3,
            ),
            note(
                BORING,
                "The most boring article about cats you'll ever read",
                "Tempus imperdiet nulla malesuada pellentesque",
                Some(ARCHIVE),
                vec![],
                2,
            ),
            note(GAGA, "Lady Gaga", "Born this way", None, vec![BAZ], 4),
        ],
    }
}

pub async fn seeded_store() -> Store {
    let store = Store::memory(Duration::from_secs(5));
    store.seed(seed_data()).await.unwrap();
    store
}

pub struct TestReply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl TestReply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The `id` of every element of a JSON array body, in order.
    pub fn ids(&self) -> Vec<String> {
        self.json()
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_str().unwrap().to_string())
            .collect()
    }
}

pub async fn call(store: &Store, method: &str, path: &str, body: Option<Value>) -> TestReply {
    let api = routes::build(store.clone());
    let mut request = warp::test::request().method(method).path(path);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.reply(&api).await;
    TestReply {
        status: response.status(),
        location: response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: response.body().to_vec(),
    }
}

pub async fn get(store: &Store, path: &str) -> TestReply {
    call(store, "GET", path, None).await
}

pub fn ids(expected: &[Uuid]) -> Vec<String> {
    expected.iter().map(Uuid::to_string).collect()
}
