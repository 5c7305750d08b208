use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use greenpulse_server::models::room::{RoomUpdate, Source};

mod common;
use common::mock_app::{MockApp, ScriptedCamera, test_frame};

async fn get(app: &MockApp, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(Method::GET)
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_get_rooms() {
    let app = MockApp::new();

    let (status, body) = get(&app, "/rooms").await;
    assert_eq!(status, StatusCode::OK);

    let rooms = body.as_array().unwrap();
    assert_eq!(rooms.len(), 6);
    assert_eq!(rooms[0]["code"], json!("A1"));
    assert_eq!(rooms[3]["source"], json!("pending"));
    assert_eq!(rooms[3]["status"], json!("waste"));
    assert_eq!(rooms[2]["status"], json!("empty"));
    assert_eq!(rooms[0]["source"], json!("static"));
}

#[tokio::test]
async fn test_get_room_by_code() {
    let app = MockApp::new();

    let (status, body) = get(&app, "/rooms/c1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], json!("C1"));
    assert_eq!(body["name"], json!("Lab Space"));
    assert_eq!(body["occupancy"], json!(6));
    assert_eq!(body["capacity"], json!(15));
    assert_eq!(body["energy"], json!(28));

    let (_, again) = get(&app, "/rooms/C1").await;
    assert_eq!(body, again);
}

#[tokio::test]
async fn test_get_unknown_room() {
    let app = MockApp::new();

    let (status, body) = get(&app, "/rooms/Z9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!(404));
    assert_eq!(body["error"]["message"], json!("Room not found"));
}

#[tokio::test]
async fn test_alerts_follow_waste_transitions() {
    let app = MockApp::new();

    let (_, body) = get(&app, "/alerts").await;
    assert_eq!(body, json!([]));

    app.occupancy
        .apply("B2", RoomUpdate::detection(3, 0.9, Source::VisionAi))
        .await
        .unwrap();
    app.occupancy
        .apply("B2", RoomUpdate::detection(0, 0.9, Source::VisionAi))
        .await
        .unwrap();

    let (status, body) = get(&app, "/alerts").await;
    assert_eq!(status, StatusCode::OK);

    let alerts = body.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["type"], json!("WARNING"));
    assert_eq!(alerts[0]["room_id"], json!("B2"));
    assert_eq!(alerts[0]["room_name"], json!("Break Room"));
}

#[tokio::test]
async fn test_summary() {
    let app = MockApp::new();

    let (status, body) = get(&app, "/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_rooms"], json!(6));
    assert_eq!(body["occupied"], json!(3));
    assert_eq!(body["waste"], json!(2));
    assert_eq!(body["empty"], json!(1));
    assert_eq!(body["waste_rooms"], json!(["B2", "C2"]));
}

#[tokio::test]
async fn test_snapshot_unavailable() {
    let app = MockApp::with_camera(Some(Arc::new(ScriptedCamera::broken())));

    let (status, body) = get(&app, "/snapshot/B2").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], json!(503));

    let (status, _) = get(&app, "/snapshot/A1").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = get(&app, "/snapshot/Z9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_snapshot_of_retained_frame() {
    let app = MockApp::with_camera(Some(Arc::new(ScriptedCamera::broken())));
    app.occupancy.frames().store(Arc::new(test_frame())).await;

    let (status, body) = get(&app, "/snapshot/b2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room_id"], json!("B2"));
    assert_eq!(body["image_source"], json!("webcam_live"));
    assert_eq!(body["is_live"], json!(true));
    assert!(!body["image_base64"].as_str().unwrap().is_empty());
}
