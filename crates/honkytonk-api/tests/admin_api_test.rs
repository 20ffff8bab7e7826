//! Admin API integration tests: authentication, channel management and sync triggers.
//!
//! Run with: `cargo test -p honkytonk-api --test admin_api_test`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::fixtures::{self, CHANNEL_ID, OTHER_CHANNEL_ID};
use helpers::{api_path, setup_test_app, setup_test_app_with, TestOptions, TEST_ADMIN_KEY};
use mockito::Matcher;
use serde_json::{json, Value};

#[tokio::test]
async fn test_admin_routes_require_key() {
    let app = setup_test_app().await;
    let client = app.client();

    let missing = client.get(&api_path("/admin/channels")).await;
    assert_eq!(missing.status_code(), 401);
    assert_eq!(missing.json::<Value>()["code"], "UNAUTHORIZED");

    let wrong = client
        .post(&api_path("/admin/sync/videos"))
        .add_header("X-Admin-Key", "not-the-admin-key-at-all-0000")
        .await;
    assert_eq!(wrong.status_code(), 401);

    let bearer = client
        .get(&api_path("/admin/channels"))
        .add_header("Authorization", format!("Bearer {}", TEST_ADMIN_KEY))
        .await;
    assert_eq!(bearer.status_code(), 200);
}

#[tokio::test]
async fn test_channel_lifecycle() {
    let app = setup_test_app().await;
    let client = app.client();

    let created = client
        .post(&api_path("/admin/channels"))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .json(&json!({ "channel": CHANNEL_ID, "name": "Lainey Wilson", "category": "artist" }))
        .await;
    assert_eq!(created.status_code(), 201);
    let channel: Value = created.json();
    assert_eq!(channel["channel_id"], CHANNEL_ID);
    assert_eq!(channel["category"], "artist");
    assert_eq!(channel["is_active"], true);
    let id = channel["id"].as_str().unwrap().to_string();

    let duplicate = client
        .post(&api_path("/admin/channels"))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .json(&json!({ "channel": format!("https://www.youtube.com/channel/{}", CHANNEL_ID) }))
        .await;
    assert_eq!(duplicate.status_code(), 409);
    assert_eq!(duplicate.json::<Value>()["code"], "CONFLICT");

    let updated = client
        .patch(&api_path(&format!("/admin/channels/{}", id)))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .json(&json!({ "is_active": false }))
        .await;
    assert_eq!(updated.status_code(), 200);
    assert_eq!(updated.json::<Value>()["is_active"], false);

    let blank = client
        .patch(&api_path(&format!("/admin/channels/{}", id)))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .json(&json!({ "name": "   " }))
        .await;
    assert_eq!(blank.status_code(), 400);
    assert_eq!(blank.json::<Value>()["code"], "INVALID_INPUT");

    let public: Value = client.get(&api_path("/channels")).await.json();
    assert!(public.as_array().unwrap().is_empty());

    let all: Value = client
        .get(&api_path("/admin/channels"))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .await
        .json();
    assert_eq!(all.as_array().unwrap().len(), 1);

    let deleted = client
        .delete(&api_path(&format!("/admin/channels/{}", id)))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .await;
    assert_eq!(deleted.status_code(), 204);

    let again = client
        .delete(&api_path(&format!("/admin/channels/{}", id)))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .await;
    assert_eq!(again.status_code(), 404);
}

#[tokio::test]
async fn test_channel_handle_needs_youtube_api_key() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/admin/channels"))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .json(&json!({ "channel": "@laineywilson" }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "NOT_CONFIGURED");
}

#[tokio::test]
async fn test_channel_handle_resolved_with_youtube_api() {
    let mut app = setup_test_app_with(TestOptions {
        env: vec![("YOUTUBE_API_KEY", "yt-test-key".to_string())],
        ..Default::default()
    })
    .await;
    let mock = app
        .upstream
        .mock("GET", "/youtube/v3/channels")
        .match_query(Matcher::UrlEncoded("forHandle".into(), "@laineywilson".into()))
        .with_status(200)
        .with_body(format!(
            r#"{{"items":[{{"id":"{}","snippet":{{"title":"Lainey Wilson","customUrl":"@laineywilson"}}}}]}}"#,
            CHANNEL_ID
        ))
        .create_async()
        .await;

    let response = app
        .client()
        .post(&api_path("/admin/channels"))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .json(&json!({ "channel": "https://www.youtube.com/@laineywilson" }))
        .await;

    mock.assert_async().await;
    assert_eq!(response.status_code(), 201);
    let channel: Value = response.json();
    assert_eq!(channel["name"], "Lainey Wilson");
    assert_eq!(channel["handle"], "@laineywilson");
}

#[tokio::test]
async fn test_invalid_channel_body_is_rejected() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/admin/channels"))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .json(&json!({ "name": "missing channel field" }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_video_sync_only_inserts_new_videos() {
    let mut app = setup_test_app().await;
    app.repos
        .channels
        .create(CHANNEL_ID, "Lainey Wilson", None, Default::default())
        .await
        .unwrap();

    let first_feed = fixtures::channel_feed(
        "Lainey Wilson",
        &[("vidAAAAAAA1", "Watermelon Moonshine"), ("vidAAAAAAA2", "Heart Like A Truck")],
    );
    let first = app
        .upstream
        .mock("GET", "/feeds/videos.xml")
        .match_query(Matcher::UrlEncoded("channel_id".into(), CHANNEL_ID.into()))
        .with_status(200)
        .with_header("content-type", "application/atom+xml")
        .with_body(first_feed)
        .expect(1)
        .create_async()
        .await;

    let run: Value = app
        .client()
        .post(&api_path("/admin/sync/videos"))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .await
        .json();
    first.assert_async().await;
    assert_eq!(run["job"], "videos");
    assert_eq!(run["status"], "success");
    assert_eq!(run["items_inserted"], 2);

    first.remove_async().await;
    let second_feed = fixtures::channel_feed(
        "Lainey Wilson",
        &[
            ("vidAAAAAAA3", "4x4xU"),
            ("vidAAAAAAA1", "Watermelon Moonshine"),
            ("vidAAAAAAA2", "Heart Like A Truck"),
        ],
    );
    app.upstream
        .mock("GET", "/feeds/videos.xml")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(second_feed)
        .create_async()
        .await;

    let run: Value = app
        .client()
        .post(&api_path("/admin/sync/video"))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .await
        .json();
    assert_eq!(run["items_fetched"], 3);
    assert_eq!(run["items_inserted"], 1);

    let videos: Value = app.client().get(&api_path("/videos")).await.json();
    assert_eq!(videos["total"], 3);
    assert_eq!(videos["items"][0]["video_id"], "vidAAAAAAA3");

    let status: Value = app.client().get(&api_path("/sync/status")).await.json();
    let runs = status["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["items_inserted"], 1);
    assert!(status["running"].as_array().unwrap().is_empty());

    let history: Value = app
        .client()
        .get(&api_path("/admin/sync/runs"))
        .add_query_param("job", "videos")
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .await
        .json();
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_failing_channel_gives_partial_run() {
    let mut app = setup_test_app().await;
    for (id, name) in [(CHANNEL_ID, "Lainey Wilson"), (OTHER_CHANNEL_ID, "Gone Channel")] {
        app.repos
            .channels
            .create(id, name, None, Default::default())
            .await
            .unwrap();
    }
    app.upstream
        .mock("GET", "/feeds/videos.xml")
        .match_query(Matcher::UrlEncoded("channel_id".into(), CHANNEL_ID.into()))
        .with_status(200)
        .with_body(fixtures::channel_feed("Lainey Wilson", &[("vidBBBBBBB1", "Wildflowers")]))
        .create_async()
        .await;
    app.upstream
        .mock("GET", "/feeds/videos.xml")
        .match_query(Matcher::UrlEncoded("channel_id".into(), OTHER_CHANNEL_ID.into()))
        .with_status(404)
        .create_async()
        .await;

    let run: Value = app
        .client()
        .post(&api_path("/admin/sync/videos"))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .await
        .json();
    assert_eq!(run["status"], "partial");
    assert_eq!(run["items_inserted"], 1);
    assert_eq!(run["details"]["failed_channels"][0]["channel_id"], OTHER_CHANNEL_ID);
}

#[tokio::test]
async fn test_unconfigured_job_records_failed_run() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/admin/sync/chart"))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .await;
    assert_eq!(response.status_code(), 200);
    let run: Value = response.json();
    assert_eq!(run["status"], "failed");
    assert!(run["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
}

#[tokio::test]
async fn test_unknown_sync_job_is_bad_request() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/admin/sync/weather"))
        .add_header("X-Admin-Key", TEST_ADMIN_KEY)
        .await;
    assert_eq!(response.status_code(), 400);
}
