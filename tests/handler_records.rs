mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_get_record_public_view() {
    let server = common::memory_server();
    let code = common::create_record(&server, "https://example.com").await;

    let response = server.get(&format!("/shorten/{}", code)).await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["short_code"], code.as_str());
    assert_eq!(body["url"], "https://example.com");
    assert!(body.get("access_count").is_none());
}

#[tokio::test]
async fn test_get_record_not_found() {
    let server = common::memory_server();

    let response = server.get("/shorten/nope42").await;

    response.assert_status_not_found();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "not_found"
    );
}

#[tokio::test]
async fn test_get_does_not_count() {
    let server = common::memory_server();
    let code = common::create_record(&server, "https://example.com").await;

    server.get(&format!("/shorten/{}", code)).await.assert_status_ok();
    server.get(&format!("/shorten/{}", code)).await.assert_status_ok();

    let stats = server.get(&format!("/shorten/{}/stats", code)).await;
    assert_eq!(stats.json::<serde_json::Value>()["access_count"], 0);
}

#[tokio::test]
async fn test_update_record() {
    let server = common::memory_server();
    let code = common::create_record(&server, "https://example.com").await;
    let created = server
        .get(&format!("/shorten/{}", code))
        .await
        .json::<serde_json::Value>();

    let response = server
        .put(&format!("/shorten/{}", code))
        .json(&json!({ "url": "https://other.com" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["short_code"], code.as_str());
    assert_eq!(body["url"], "https://other.com");
    assert_eq!(body["created_at"], created["created_at"]);
    assert_eq!(body["access_count"], 0);
}

#[tokio::test]
async fn test_update_record_not_found() {
    let server = common::memory_server();

    let response = server
        .put("/shorten/nope42")
        .json(&json!({ "url": "https://other.com" }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_update_record_invalid_url() {
    let server = common::memory_server();
    let code = common::create_record(&server, "https://example.com").await;

    let response = server
        .put(&format!("/shorten/{}", code))
        .json(&json!({ "url": "ftp://example.com" }))
        .await;

    response.assert_status_bad_request();

    let unchanged = server.get(&format!("/shorten/{}", code)).await;
    assert_eq!(
        unchanged.json::<serde_json::Value>()["url"],
        "https://example.com"
    );
}

#[tokio::test]
async fn test_delete_record() {
    let server = common::memory_server();
    let code = common::create_record(&server, "https://example.com").await;

    server
        .delete(&format!("/shorten/{}", code))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/shorten/{}", code))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_absent_is_no_content() {
    let server = common::memory_server();

    server
        .delete("/shorten/nope42")
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_stats_not_found() {
    let server = common::memory_server();

    server
        .get("/shorten/nope42/stats")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_record_lifecycle() {
    let server = common::memory_server();
    let code = common::create_record(&server, "https://example.com").await;

    server
        .get(&format!("/{}", code))
        .await
        .assert_status(StatusCode::FOUND);

    let updated = server
        .put(&format!("/shorten/{}", code))
        .json(&json!({ "url": "https://other.com" }))
        .await
        .json::<serde_json::Value>();
    assert_eq!(updated["url"], "https://other.com");
    assert_eq!(updated["access_count"], 1);

    server
        .delete(&format!("/shorten/{}", code))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/shorten/{}/stats", code))
        .await
        .assert_status_not_found();
}
