//! HTTP-level tests for testimonial submission and moderation.
//!
//! The testimonial workflow runs against the in-memory store, so no
//! database is needed.

mod common;

use axum::http::header::CACHE_CONTROL;
use axum::http::{Method, StatusCode};
use common::{
    body_json, build_memory_app, delete_auth, get, get_auth, post_auth, post_json,
    post_json_auth, send, send_multipart, Part, TestApp,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn submit(app: &TestApp, name: &str, role: &str, content: &str) -> serde_json::Value {
    let response = post_json_auth(
        app.app(),
        "/api/v1/testimonials",
        &app.user_token(7),
        json!({ "name": name, "role": role, "content": content }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn pending(app: &TestApp) -> Vec<serde_json::Value> {
    let response = get_auth(app.app(), "/api/v1/admin/testimonials/pending", &app.admin_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]
        .as_array()
        .expect("array")
        .clone()
}

async fn pending_count(app: &TestApp) -> i64 {
    let response = get_auth(
        app.app(),
        "/api/v1/admin/testimonials/pending/count",
        &app.admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["count"]
        .as_i64()
        .expect("count")
}

async fn published(app: &TestApp) -> Vec<serde_json::Value> {
    let response = get(app.app(), "/api/v1/testimonials").await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]
        .as_array()
        .expect("array")
        .clone()
}

async fn approve(app: &TestApp, id: i64) -> axum::http::Response<axum::body::Body> {
    post_auth(
        app.app(),
        &format!("/api/v1/admin/testimonials/pending/{id}/approve"),
        &app.admin_token(),
    )
    .await
}

async fn reject(app: &TestApp, id: i64) -> axum::http::Response<axum::body::Body> {
    post_auth(
        app.app(),
        &format!("/api/v1/admin/testimonials/pending/{id}/reject"),
        &app.admin_token(),
    )
    .await
}

async fn approved_id(app: &TestApp) -> i64 {
    let pending = submit(app, "Ana", "Estudiante", "Excelente").await;
    let response = approve(app, pending["id"].as_i64().expect("id")).await;
    assert_eq!(response.status(), StatusCode::OK);
    published(app).await[0]["id"].as_i64().expect("id")
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_queues_exactly_one_pending_record() {
    let app = build_memory_app();

    let created = submit(&app, "Ana", "Estudiante", "Excelente").await;
    assert_eq!(created["name"], "Ana");
    assert_eq!(created["role"], "Estudiante");
    assert_eq!(created["content"], "Excelente");
    assert_eq!(created["submitted_by"], 7);

    let rows = pending(&app).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], created["id"]);
    assert!(published(&app).await.is_empty(), "nothing is public before approval");
}

#[tokio::test]
async fn submit_requires_sign_in() {
    let app = build_memory_app();
    let response = post_json(
        app.app(),
        "/api/v1/testimonials",
        json!({ "name": "Ana", "role": "Estudiante", "content": "Excelente" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn submit_strips_markup_and_rejects_short_content() {
    let app = build_memory_app();

    let created = submit(&app, "<b>Ana</b>", "Estudiante", "Muy <i>bueno</i>").await;
    assert_eq!(created["name"], "Ana");
    assert_eq!(created["content"], "Muy bueno");

    let response = post_json_auth(
        app.app(),
        "/api/v1/testimonials",
        &app.user_token(7),
        json!({ "name": "Ana", "role": "Estudiante", "content": "ok" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Pending queue
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pending_list_is_newest_first_and_matches_count() {
    let app = build_memory_app();
    submit(&app, "Ana", "Estudiante", "Primero").await;
    submit(&app, "Luis", "Egresado", "Segundo").await;
    submit(&app, "Marta", "Docente", "Tercero").await;

    let rows = pending(&app).await;
    let names: Vec<_> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Marta", "Luis", "Ana"]);
    assert_eq!(pending_count(&app).await, rows.len() as i64);
}

#[tokio::test]
async fn pending_views_are_never_cached() {
    let app = build_memory_app();
    for uri in [
        "/api/v1/admin/testimonials/pending",
        "/api/v1/admin/testimonials/pending/count",
    ] {
        let response = get_auth(app.app(), uri, &app.admin_token()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CACHE_CONTROL], "no-store", "{uri}");
    }
}

#[tokio::test]
async fn count_carries_poll_interval() {
    let app = build_memory_app();
    let response = get_auth(
        app.app(),
        "/api/v1/admin/testimonials/pending/count",
        &app.admin_token(),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["count"], 0);
    assert_eq!(json["data"]["poll_interval_secs"], 5);
}

#[tokio::test]
async fn moderation_routes_require_admin() {
    let app = build_memory_app();

    let response = get(app.app(), "/api/v1/admin/testimonials/pending").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(
        app.app(),
        "/api/v1/admin/testimonials/pending",
        &app.user_token(7),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_auth(
        app.app(),
        "/api/v1/admin/testimonials/pending/1/approve",
        &app.user_token(7),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Approve / reject
// ---------------------------------------------------------------------------

#[tokio::test]
async fn approve_moves_record_to_published() {
    let app = build_memory_app();
    let created = submit(&app, "Ana", "Estudiante", "Excelente").await;
    let id = created["id"].as_i64().unwrap();

    // Warm the published cache so approval has something to invalidate.
    assert!(published(&app).await.is_empty());

    let response = approve(&app, id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = body_json(response).await;
    assert_eq!(outcome["data"]["id"], id);
    assert_eq!(outcome["data"]["decision"], "approved");
    assert_eq!(outcome["data"]["removed"], true);

    let rows = published(&app).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Ana");
    assert_eq!(rows[0]["role"], "Estudiante");
    assert_eq!(rows[0]["content"], "Excelente");
    assert_eq!(rows[0]["source_pending_id"], id);
    assert!(rows[0].get("photo_path").is_none(), "storage key stays private");

    assert!(pending(&app).await.is_empty());
    assert_eq!(pending_count(&app).await, 0);
}

#[tokio::test]
async fn approving_a_missing_record_is_not_found() {
    let app = build_memory_app();
    let response = approve(&app, 404).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(published(&app).await.is_empty());
}

#[tokio::test]
async fn concurrent_approvals_publish_once() {
    let app = build_memory_app();
    let created = submit(&app, "Ana", "Estudiante", "Excelente").await;
    let id = created["id"].as_i64().unwrap();

    let (a, b) = tokio::join!(approve(&app, id), approve(&app, id));
    let mut statuses = [a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::NOT_FOUND]);

    assert_eq!(published(&app).await.len(), 1);
}

#[tokio::test]
async fn reject_removes_without_publishing() {
    let app = build_memory_app();
    let created = submit(&app, "Ana", "Estudiante", "Excelente").await;
    let id = created["id"].as_i64().unwrap();

    let response = reject(&app, id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = body_json(response).await;
    assert_eq!(outcome["data"]["decision"], "rejected");
    assert_eq!(outcome["data"]["removed"], true);

    assert!(pending(&app).await.is_empty());
    assert!(published(&app).await.is_empty());
}

#[tokio::test]
async fn rejecting_twice_succeeds() {
    let app = build_memory_app();
    let created = submit(&app, "Ana", "Estudiante", "Excelente").await;
    let id = created["id"].as_i64().unwrap();

    assert_eq!(reject(&app, id).await.status(), StatusCode::OK);

    let response = reject(&app, id).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["removed"], false);
}

#[tokio::test]
async fn moderation_publishes_change_events() {
    let app = build_memory_app();
    let mut rx = app.events.subscribe();

    let created = submit(&app, "Ana", "Estudiante", "Excelente").await;
    let submitted = rx.recv().await.expect("submit event");
    assert_eq!(submitted.source_entity_id, created["id"].as_i64());

    approve(&app, created["id"].as_i64().unwrap()).await;
    let approved = rx.recv().await.expect("approve event");
    assert!(approved.invalidates.iter().any(|k| k == "testimonials"));
    assert!(approved.invalidates.iter().any(|k| k == "pending-testimonials-count"));
}

// ---------------------------------------------------------------------------
// Photos
// ---------------------------------------------------------------------------

#[tokio::test]
async fn oversized_photo_is_rejected_before_upload() {
    let app = build_memory_app();
    let id = approved_id(&app).await;

    let photo = vec![0u8; 15 * 1024 * 1024];
    let response = send_multipart(
        app.app(),
        Method::PUT,
        &format!("/api/v1/admin/testimonials/{id}/photo"),
        &app.admin_token(),
        vec![Part::file("photo", "big.jpg", "image/jpeg", photo)],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap_or_default();
    assert!(message.contains("too large"), "{message}");
    assert_eq!(app.objects.upload_count(), 0, "no bytes may reach storage");
}

#[tokio::test]
async fn photo_upload_sets_public_url() {
    let app = build_memory_app();
    let id = approved_id(&app).await;

    let response = send_multipart(
        app.app(),
        Method::PUT,
        &format!("/api/v1/admin/testimonials/{id}/photo"),
        &app.admin_token(),
        vec![Part::file("photo", "ana.png", "image/png", vec![1, 2, 3])],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let url = json["data"]["photo_url"].as_str().expect("photo_url");
    assert!(url.contains("/testimonials/"), "{url}");
    assert!(url.ends_with(".png"), "{url}");
    assert!(!url.contains("ana"), "client filename must not leak into the key");
    assert_eq!(app.objects.object_count("testimonials"), 1);

    assert_eq!(published(&app).await[0]["photo_url"], url);
}

#[tokio::test]
async fn photo_upload_requires_photo_field_and_image_type() {
    let app = build_memory_app();
    let id = approved_id(&app).await;
    let uri = format!("/api/v1/admin/testimonials/{id}/photo");

    let response = send_multipart(
        app.app(),
        Method::PUT,
        &uri,
        &app.admin_token(),
        vec![Part::text("caption", "hola")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send_multipart(
        app.app(),
        Method::PUT,
        &uri,
        &app.admin_token(),
        vec![Part::file("photo", "doc.pdf", "application/pdf", vec![1])],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.objects.upload_count(), 0);
}

#[tokio::test]
async fn photo_for_unknown_testimonial_is_not_found() {
    let app = build_memory_app();
    let response = send_multipart(
        app.app(),
        Method::PUT,
        "/api/v1/admin/testimonials/99/photo",
        &app.admin_token(),
        vec![Part::file("photo", "a.jpg", "image/jpeg", vec![1])],
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.objects.upload_count(), 0);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_requires_confirmation() {
    let app = build_memory_app();
    let id = approved_id(&app).await;

    let response = delete_auth(
        app.app(),
        &format!("/api/v1/admin/testimonials/{id}"),
        &app.admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(published(&app).await.len(), 1);

    let response = delete_auth(
        app.app(),
        &format!("/api/v1/admin/testimonials/{id}?confirm=true"),
        &app.admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(published(&app).await.is_empty());

    let response = send(
        app.app(),
        Method::DELETE,
        &format!("/api/v1/admin/testimonials/{id}?confirm=true"),
        Some(&app.admin_token()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_stored_photo() {
    let app = build_memory_app();
    let id = approved_id(&app).await;

    send_multipart(
        app.app(),
        Method::PUT,
        &format!("/api/v1/admin/testimonials/{id}/photo"),
        &app.admin_token(),
        vec![Part::file("photo", "a.jpg", "image/jpeg", vec![1, 2])],
    )
    .await;
    assert_eq!(app.objects.object_count("testimonials"), 1);

    let response = delete_auth(
        app.app(),
        &format!("/api/v1/admin/testimonials/{id}?confirm=true"),
        &app.admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.objects.object_count("testimonials"), 0);
}
