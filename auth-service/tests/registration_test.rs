mod common;

use axum::http::StatusCode;
use common::{post_json, register_alice, test_app};
use serde_json::json;

#[tokio::test]
async fn test_register_success() {
    let app = test_app().await;

    let (status, body) = post_json(
        &app,
        "/register",
        json!({
            "identifier": "alice@example.com",
            "password": "Str0ng!Pass",
            "firstName": "Alice",
            "lastName": "A"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Registration successful");
}

#[tokio::test]
async fn test_register_duplicate_identifier() {
    let app = test_app().await;
    register_alice(&app).await;

    let (status, body) = post_json(
        &app,
        "/register",
        json!({
            "identifier": "alice@example.com",
            "password": "Str0ng!Pass",
            "firstName": "Alice",
            "lastName": "A"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Identifier already registered");
}

#[tokio::test]
async fn test_register_empty_field() {
    let app = test_app().await;

    let (status, body) = post_json(
        &app,
        "/register",
        json!({
            "identifier": "alice@example.com",
            "password": "Str0ng!Pass",
            "firstName": "",
            "lastName": "A"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("First name"));
}

#[tokio::test]
async fn test_register_missing_field() {
    let app = test_app().await;

    let (status, _body) = post_json(
        &app,
        "/register",
        json!({
            "identifier": "alice@example.com",
            "password": "Str0ng!Pass"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_each_weak_password() {
    let app = test_app().await;

    let cases = [
        ("Sh0rt!x", "at least 8 characters"),
        ("str0ng!pass", "uppercase"),
        ("STR0NG!PASS", "lowercase"),
        ("Strong!Pass", "number"),
        ("Str0ngPass1", "special character"),
    ];

    for (password, expected_fragment) in cases {
        let (status, body) = post_json(
            &app,
            "/register",
            json!({
                "identifier": "alice@example.com",
                "password": password,
                "firstName": "Alice",
                "lastName": "A"
            }),
        )
        .await;

        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "password {:?} should have been rejected",
            password
        );
        assert!(
            body["error"].as_str().unwrap().contains(expected_fragment),
            "unexpected error for {:?}: {}",
            password,
            body["error"]
        );
    }

    // None of the rejected attempts created the account
    let (status, _) = post_json(
        &app,
        "/register",
        json!({
            "identifier": "alice@example.com",
            "password": "Str0ng!Pass",
            "firstName": "Alice",
            "lastName": "A"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}
