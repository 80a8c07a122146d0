//! HTTP store client contract tests against an in-process mock server

mod helpers;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use helpers::entry;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use wkvp_common::types::{OverlayEntry, OverlaySubmission, ProgressRecord, ProgressUpdate};
use wkvp_player::{Error, HttpStoreClient, OverlayStore, ProgressStore};

/// Bind a router on an ephemeral port and return its base URL
async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn fetch_for_media_returns_ordered_entries() {
    let entries = vec![entry("a", 58.0), entry("b", 60.0), entry("c", 62.0)];
    let payload = entries.clone();

    let router = Router::new().route(
        "/overlays/for-media/:media_id",
        get(move |Path(_media_id): Path<Uuid>| {
            let payload = payload.clone();
            async move { Json(payload) }
        }),
    );
    let base = spawn_server(router).await;

    let client = HttpStoreClient::new(base);
    let fetched = client.fetch_for_media(Uuid::new_v4()).await.unwrap();
    assert_eq!(fetched, entries);
}

#[tokio::test]
async fn submit_returns_canonical_entry_with_server_id() {
    let server_id = Uuid::new_v4();

    let router = Router::new().route(
        "/overlays",
        post(move |Json(submission): Json<OverlaySubmission>| async move {
            Json(OverlayEntry {
                id: server_id,
                text: submission.text,
                timestamp: submission.timestamp,
                color: submission.color,
                font_size: submission.font_size,
                lane: submission.lane,
            })
        }),
    );
    let base = spawn_server(router).await;

    let client = HttpStoreClient::new(base);
    let submission = OverlaySubmission {
        media_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        text: "hello".to_string(),
        timestamp: 120.3,
        color: "#FFFFFF".to_string(),
        font_size: 20,
        lane: Default::default(),
    };

    let created = client.submit(&submission).await.unwrap();
    assert_eq!(created.id, server_id);
    assert_eq!(created.text, "hello");
    assert_eq!(created.timestamp, 120.3);
}

#[tokio::test]
async fn save_posts_progress_update() {
    let received: Arc<Mutex<Vec<ProgressUpdate>>> = Arc::new(Mutex::new(Vec::new()));

    let router = Router::new()
        .route(
            "/progress",
            post(
                |State(received): State<Arc<Mutex<Vec<ProgressUpdate>>>>,
                 Json(update): Json<ProgressUpdate>| async move {
                    received.lock().unwrap().push(update);
                    StatusCode::OK
                },
            ),
        )
        .with_state(Arc::clone(&received));
    let base = spawn_server(router).await;

    let client = HttpStoreClient::new(base);
    let update = ProgressUpdate {
        user_id: Uuid::new_v4(),
        media_id: Uuid::new_v4(),
        position_secs: 61.0,
        duration_secs: 200.0,
    };
    client.save(&update).await.unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].position_secs, 61.0);
}

#[tokio::test]
async fn load_maps_missing_record_to_none() {
    let media_with_record = Uuid::new_v4();

    let router = Router::new().route(
        "/progress/:media_id/:user_id",
        get(
            move |Path((media_id, _user_id)): Path<(Uuid, Uuid)>| async move {
                if media_id == media_with_record {
                    Ok(Json(ProgressRecord {
                        position_secs: 45.0,
                        duration_secs: 200.0,
                        completed: false,
                    }))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            },
        ),
    );
    let base = spawn_server(router).await;

    let client = HttpStoreClient::new(base);

    let record = client
        .load(media_with_record, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(record.unwrap().position_secs, 45.0);

    let missing = client.load(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn store_rejection_surfaces_status_and_message() {
    let router = Router::new().route(
        "/overlays",
        post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "text too long") }),
    );
    let base = spawn_server(router).await;

    let client = HttpStoreClient::new(base);
    let submission = OverlaySubmission {
        media_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        text: "hello".to_string(),
        timestamp: 1.0,
        color: "#FFFFFF".to_string(),
        font_size: 20,
        lane: Default::default(),
    };

    match client.submit(&submission).await {
        Err(Error::Store { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "text too long");
        }
        other => panic!("expected store error, got {:?}", other.map(|e| e.text)),
    }
}

#[tokio::test]
async fn unreachable_store_is_a_network_error() {
    // Nothing listens on this port
    let client = HttpStoreClient::new("http://127.0.0.1:1");
    let result = client.fetch_for_media(Uuid::new_v4()).await;
    assert!(matches!(result, Err(Error::Network(_))));
}
