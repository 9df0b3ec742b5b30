use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use converty_convert::{build_dispatcher, OutputWorkspace};
use converty_queue::{ConversionStore, QueueRunner};
use converty_server::state::AppState;

fn test_app(output_dir: &std::path::Path) -> Router {
    let store = Arc::new(ConversionStore::new());
    let dispatcher = Arc::new(build_dispatcher(OutputWorkspace::new(output_dir), 85));
    let runner = Arc::new(QueueRunner::new(Arc::clone(&store), dispatcher));
    let state = Arc::new(AppState::new(store, runner));
    converty_server::build_router(state)
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn post_json(app: &Router, uri: &str, body: Value) -> axum::response::Response {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

async fn delete(app: &Router, uri: &str) -> axum::response::Response {
    let req = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

/// Poll a job until it reaches a terminal state.
async fn wait_terminal(app: &Router, id: &str) -> Value {
    for _ in 0..300 {
        let resp = get(app, &format!("/conversions/{id}")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let job = body_json(resp).await;
        match job["state"].as_str() {
            Some("completed" | "failed" | "cancelled") => return job,
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("job {id} never reached a terminal state");
}

#[tokio::test]
async fn health_responds_ok() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = test_app(&dir.path().join("out"));

    let resp = get(&app, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn enqueue_infers_category_from_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("notes.md");
    tokio::fs::write(&source, "hello").await.expect("write source");
    let app = test_app(&dir.path().join("out"));

    let resp = post_json(
        &app,
        "/conversions",
        json!({
            "sourceUri": source.to_string_lossy(),
            "sourceName": "notes.md",
            "targetFormat": "txt",
        }),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let job = body_json(resp).await;
    assert_eq!(job["category"], "text");
}

#[tokio::test]
async fn enqueue_rejects_unsupported_target() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = test_app(&dir.path().join("out"));

    let resp = post_json(
        &app,
        "/conversions",
        json!({
            "sourceUri": "/tmp/photo.png",
            "sourceName": "photo.png",
            "category": "image",
            "targetFormat": "tiff",
        }),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("unsupported target format"));
}

#[tokio::test]
async fn text_csv_conversion_completes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("notes.txt");
    tokio::fs::write(&source, "a b\nc  d\n\n").await.expect("write source");
    let app = test_app(&dir.path().join("out"));

    let resp = post_json(
        &app,
        "/conversions",
        json!({
            "sourceUri": source.to_string_lossy(),
            "sourceName": "notes.txt",
            "category": "text",
            "targetFormat": "csv",
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let job = body_json(resp).await;
    assert_eq!(job["state"], "queued");
    let id = job["id"].as_str().expect("job id").to_string();

    let done = wait_terminal(&app, &id).await;
    assert_eq!(done["state"], "completed");
    assert_eq!(done["progress"], 100);
    assert!(done["completedAt"].is_string());

    let output = done["outputUri"].as_str().expect("output uri");
    let written = tokio::fs::read_to_string(output).await.expect("output file");
    assert_eq!(written, "a,b\nc,d");
}

#[tokio::test]
async fn jobs_reach_terminal_states_in_enqueue_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = dir.path().join("photo.png");
    let pixels = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
    pixels
        .save_with_format(&photo, image::ImageFormat::Png)
        .expect("write png");
    let notes = dir.path().join("notes.txt");
    tokio::fs::write(&notes, "alpha\nbeta").await.expect("write text");
    let app = test_app(&dir.path().join("out"));

    let bodies = [
        json!({
            "sourceUri": photo.to_string_lossy(),
            "sourceName": "photo.png",
            "category": "image",
            "targetFormat": "jpg",
        }),
        json!({
            "sourceUri": notes.to_string_lossy(),
            "sourceName": "notes.txt",
            "category": "text",
            "targetFormat": "json",
        }),
        json!({
            "sourceUri": "/tmp/song.mp3",
            "sourceName": "song.mp3",
            "category": "audio",
            "targetFormat": "wav",
        }),
    ];

    let mut ids = Vec::new();
    for body in bodies {
        let resp = post_json(&app, "/conversions", body).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        ids.push(body_json(resp).await["id"].as_str().unwrap().to_string());
    }

    for id in &ids {
        wait_terminal(&app, id).await;
    }

    let listing = body_json(get(&app, "/conversions").await).await;
    assert_eq!(listing["total"], 3);
    let items = listing["items"].as_array().expect("items");
    let listed_ids: Vec<_> = items.iter().map(|j| j["id"].as_str().unwrap()).collect();
    assert_eq!(listed_ids, ids.iter().map(String::as_str).collect::<Vec<_>>());

    assert_eq!(items[0]["state"], "completed");
    assert_eq!(items[1]["state"], "completed");
    assert_eq!(items[2]["state"], "failed");
    assert!(items[2]["error"].as_str().unwrap().contains("FFmpeg"));

    // Terminal order follows enqueue order.
    let stamps: Vec<_> = items
        .iter()
        .map(|j| j["completedAt"].as_str().unwrap().to_string())
        .collect();
    let mut sorted = stamps.clone();
    sorted.sort();
    assert_eq!(stamps, sorted);
}

#[tokio::test]
async fn cancel_is_rejected_for_unknown_and_finished_jobs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("notes.txt");
    tokio::fs::write(&source, "one line").await.expect("write source");
    let app = test_app(&dir.path().join("out"));

    let resp = post_json(
        &app,
        &format!("/conversions/{}/cancel", uuid::Uuid::new_v4()),
        json!({}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = post_json(
        &app,
        "/conversions",
        json!({
            "sourceUri": source.to_string_lossy(),
            "sourceName": "notes.txt",
            "category": "text",
            "targetFormat": "txt",
        }),
    )
    .await;
    let id = body_json(resp).await["id"].as_str().unwrap().to_string();
    wait_terminal(&app, &id).await;

    let resp = post_json(&app, &format!("/conversions/{id}/cancel"), json!({})).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn clear_completed_is_idempotent_over_http() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("notes.txt");
    tokio::fs::write(&source, "one line").await.expect("write source");
    let app = test_app(&dir.path().join("out"));

    let resp = post_json(
        &app,
        "/conversions",
        json!({
            "sourceUri": source.to_string_lossy(),
            "sourceName": "notes.txt",
            "category": "text",
            "targetFormat": "txt",
        }),
    )
    .await;
    let id = body_json(resp).await["id"].as_str().unwrap().to_string();
    wait_terminal(&app, &id).await;

    let resp = delete(&app, "/conversions/completed").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["cleared"], true);
    let listing = body_json(get(&app, "/conversions").await).await;
    assert_eq!(listing["total"], 0);

    let resp = delete(&app, "/conversions/completed").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listing = body_json(get(&app, "/conversions").await).await;
    assert_eq!(listing["total"], 0);
}
