mod common;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

#[tokio::test]
async fn test_create_generates_code() {
    let app = common::test_app();

    let body = common::create_link(
        &app.server,
        json!({ "original_url": "https://example.com/page" }),
    )
    .await;

    let code = body["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["short_url"], format!("{}/{}", common::BASE_URL, code));
    assert_eq!(body["original_url"], "https://example.com/page");
    assert!(body.get("custom_alias").is_none());
    assert!(body.get("expires_at").is_none());
}

#[tokio::test]
async fn test_create_alias_then_duplicate_conflicts() {
    let app = common::test_app();

    let body = common::create_alias(&app.server, "https://example.com/page", "mylink").await;
    assert_eq!(body["short_code"], "mylink");
    assert_eq!(body["custom_alias"], "mylink");
    assert_eq!(body["short_url"], "http://sho.rt/mylink");

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({ "original_url": "https://other.example.com", "custom_alias": "mylink" }))
        .await;

    assert_eq!(response.status_code(), 409);
    let error: Value = response.json();
    assert_eq!(error["error"]["code"], "duplicate_alias");
}

#[tokio::test]
async fn test_create_rejects_invalid_url() {
    let app = common::test_app();

    for url in ["not a url", "ftp://example.com/file", "https://"] {
        let response = app
            .server
            .post("/api/v1/urls")
            .json(&json!({ "original_url": url }))
            .await;

        assert_eq!(response.status_code(), 400, "{url}");
        let error: Value = response.json();
        assert_eq!(error["error"]["code"], "invalid_url");
    }
}

#[tokio::test]
async fn test_create_rejects_bad_aliases() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({ "original_url": "https://example.com", "custom_alias": "waytoolongalias" }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["error"]["code"], "alias_too_long");

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({ "original_url": "https://example.com", "custom_alias": "my-link" }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["error"]["code"], "invalid_alias");
}

#[tokio::test]
async fn test_create_malformed_payload_is_bad_request() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({ "custom_alias": "nourl" }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({ "original_url": "" }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_create_with_expiry() {
    let app = common::test_app();

    let body = common::create_link(
        &app.server,
        json!({ "original_url": "https://example.com", "expires_in_days": 2 }),
    )
    .await;

    let expires_at: DateTime<Utc> = body["expires_at"].as_str().unwrap().parse().unwrap();
    let expected = Utc::now() + Duration::days(2);
    assert!((expires_at - expected).num_seconds().abs() <= 5);
}

#[tokio::test]
async fn test_create_uses_default_expiry() {
    let app = common::test_app_with(common::TestOptions {
        default_expiry_days: 30,
        ..Default::default()
    });

    let body = common::create_link(&app.server, json!({ "original_url": "https://example.com" }))
        .await;

    let created_at: DateTime<Utc> = body["created_at"].as_str().unwrap().parse().unwrap();
    let expires_at: DateTime<Utc> = body["expires_at"].as_str().unwrap().parse().unwrap();
    assert!(((expires_at - created_at) - Duration::days(30)).num_seconds().abs() <= 5);
}

#[tokio::test]
async fn test_get_by_id_with_stats() {
    let app = common::test_app();
    let created = common::create_alias(&app.server, "https://example.com/page", "stats1").await;
    let id = created["id"].as_i64().unwrap();

    app.service
        .record_click(id, "https://google.com", "Mozilla/5.0", "10.0.0.1")
        .await
        .unwrap();

    let response = app.server.get(&format!("/api/v1/urls/{id}")).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["url"]["id"], id);
    assert_eq!(body["url"]["short_code"], "stats1");
    assert_eq!(body["url"]["original_url"], "https://example.com/page");
    assert_eq!(body["stats"]["click_count"], 1);
    assert!(body["stats"]["last_click"].is_string());
}

#[tokio::test]
async fn test_get_by_id_errors() {
    let app = common::test_app();

    let response = app.server.get("/api/v1/urls/999").await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");

    let response = app.server.get("/api/v1/urls/abc").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_update_url_and_alias() {
    let app = common::test_app();
    let created = common::create_link(&app.server, json!({ "original_url": "https://example.com" }))
        .await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .server
        .put(&format!("/api/v1/urls/{id}"))
        .json(&json!({ "original_url": "https://new.example.org/", "custom_alias": "renamed" }))
        .await;
    assert_eq!(response.status_code(), 204);

    let body: Value = app.server.get(&format!("/api/v1/urls/{id}")).await.json();
    assert_eq!(body["url"]["original_url"], "https://new.example.org/");
    assert_eq!(body["url"]["short_code"], "renamed");
    assert_eq!(body["url"]["custom_alias"], "renamed");
}

#[tokio::test]
async fn test_update_only_expiry_keeps_url_and_code() {
    let app = common::test_app();
    let created = common::create_alias(&app.server, "https://example.com/page", "keepme").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .server
        .put(&format!("/api/v1/urls/{id}"))
        .json(&json!({ "expires_in": 5 }))
        .await;
    assert_eq!(response.status_code(), 204);

    let body: Value = app.server.get(&format!("/api/v1/urls/{id}")).await.json();
    assert_eq!(body["url"]["original_url"], "https://example.com/page");
    assert_eq!(body["url"]["short_code"], "keepme");
    assert!(body["url"]["expires_at"].is_string());
}

#[tokio::test]
async fn test_update_errors() {
    let app = common::test_app();
    common::create_alias(&app.server, "https://example.com/a", "taken").await;
    let created = common::create_alias(&app.server, "https://example.com/b", "mine").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .server
        .put(&format!("/api/v1/urls/{id}"))
        .json(&json!({ "custom_alias": "taken" }))
        .await;
    assert_eq!(response.status_code(), 409);

    let response = app
        .server
        .put(&format!("/api/v1/urls/{id}"))
        .json(&json!({ "original_url": "mailto:someone@example.com" }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .server
        .put("/api/v1/urls/999")
        .json(&json!({ "expires_in": 1 }))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = app
        .server
        .put("/api/v1/urls/nope")
        .json(&json!({ "expires_in": 1 }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_delete_url() {
    let app = common::test_app();
    let created = common::create_alias(&app.server, "https://example.com", "bye").await;
    let id = created["id"].as_i64().unwrap();

    let response = app.server.delete(&format!("/api/v1/urls/{id}")).await;
    assert_eq!(response.status_code(), 204);

    let response = app.server.get(&format!("/api/v1/urls/{id}")).await;
    assert_eq!(response.status_code(), 404);

    let response = app.server.delete(&format!("/api/v1/urls/{id}")).await;
    assert_eq!(response.status_code(), 404);

    let response = app.server.get("/bye").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_deleted_alias_stays_reserved() {
    let app = common::test_app();
    let created = common::create_alias(&app.server, "https://example.com", "once").await;
    let id = created["id"].as_i64().unwrap();

    app.server.delete(&format!("/api/v1/urls/{id}")).await;

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({ "original_url": "https://example.com", "custom_alias": "once" }))
        .await;
    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn test_expire_via_update_then_redirect_is_gone() {
    let app = common::test_app();
    let created = common::create_alias(&app.server, "https://example.com/page", "mylink").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .server
        .put(&format!("/api/v1/urls/{id}"))
        .json(&json!({ "expires_in_days": -1 }))
        .await;
    assert_eq!(response.status_code(), 204);

    let response = app.server.get("/mylink").await;
    assert_eq!(response.status_code(), 410);
    assert_eq!(response.json::<Value>()["error"]["code"], "expired");
}

#[tokio::test]
async fn test_replaced_alias_is_never_reissued() {
    let app = common::test_app();
    let created = common::create_alias(&app.server, "https://example.com/page", "first1").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .server
        .put(&format!("/api/v1/urls/{id}"))
        .json(&json!({ "custom_alias": "second" }))
        .await;
    assert_eq!(response.status_code(), 204);

    let response = app
        .server
        .post("/api/v1/urls")
        .json(&json!({ "original_url": "https://other.example.com/", "custom_alias": "first1" }))
        .await;
    assert_eq!(response.status_code(), 409);
    assert_eq!(response.json::<Value>()["error"]["code"], "duplicate_alias");

    let other = common::create_alias(&app.server, "https://other.example.com/", "other1").await;
    let response = app
        .server
        .put(&format!("/api/v1/urls/{}", other["id"]))
        .json(&json!({ "custom_alias": "first1" }))
        .await;
    assert_eq!(response.status_code(), 409);

    assert_eq!(app.server.get("/first1").await.status_code(), 404);

    let response = app.server.get("/second").await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/page");
}
