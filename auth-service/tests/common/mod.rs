use auth_service::{
    build_router,
    config::{
        AuthConfig, Environment, HashingConfig, LockoutConfig, SecurityConfig, SwaggerConfig,
        SwaggerMode, TokenConfig,
    },
    services::{AuthService, CredentialStore, LockoutTracker, PasswordPolicy, TokenService},
    AppState,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::util::ServiceExt;

pub fn test_config() -> AuthConfig {
    AuthConfig {
        common: service_core::config::Config { port: 8080 },
        environment: Environment::Dev,
        service_name: "auth-service".to_string(),
        service_version: "test".to_string(),
        log_level: "error".to_string(),
        token: TokenConfig { ttl_seconds: 3600 },
        lockout: LockoutConfig {
            max_attempts: 3,
            lock_duration_seconds: 900,
        },
        // Cheap parameters keep the test suite fast
        hashing: HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        swagger: SwaggerConfig {
            enabled: SwaggerMode::Disabled,
        },
    }
}

pub async fn app_with_config(config: AuthConfig) -> Router {
    let credentials = CredentialStore::new(&config.hashing).expect("Failed to build store");
    let lockout = LockoutTracker::new(&config.lockout);
    let tokens = TokenService::new(&config.token);
    let auth = AuthService::new(credentials, lockout, tokens, PasswordPolicy::default());

    let state = AppState { config, auth };
    build_router(state).await.expect("Failed to build router")
}

pub async fn test_app() -> Router {
    app_with_config(test_config()).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn request_with_token(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn register_alice(app: &Router) {
    let (status, _) = post_json(
        app,
        "/register",
        serde_json::json!({
            "identifier": "alice@example.com",
            "password": "Str0ng!Pass",
            "firstName": "Alice",
            "lastName": "A"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

pub async fn login_alice(app: &Router, password: &str) -> (StatusCode, serde_json::Value) {
    post_json(
        app,
        "/login",
        serde_json::json!({
            "identifier": "alice@example.com",
            "password": password
        }),
    )
    .await
}
