pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    extract::State,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{openapi::security::SecurityScheme, Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AuthConfig;
use crate::services::AuthService;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::auth::registration::register,
        handlers::auth::session::login,
        handlers::auth::session::logout,
        handlers::user::get_me,
    ),
    components(
        schemas(
            dtos::auth::RegisterRequest,
            dtos::auth::LoginRequest,
            dtos::auth::LoginResponse,
            dtos::ErrorResponse,
            dtos::MessageResponse,
            models::SanitizedUser,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Account registration and session management"),
        (name = "User", description = "Authenticated account profile"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AuthConfig,
    pub auth: AuthService,
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(handlers::metrics::metrics));

    // Only expose Swagger UI where the config allows it
    let swagger_enabled = match state.config.environment {
        crate::config::Environment::Dev => true,
        crate::config::Environment::Prod => match state.config.swagger.enabled {
            crate::config::SwaggerMode::Public | crate::config::SwaggerMode::Authenticated => true,
            crate::config::SwaggerMode::Disabled => false,
        },
    };

    if swagger_enabled {
        app =
            app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        // Still provide the OpenAPI JSON for programmatic access
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );
    }

    let app = app
        // Authentication routes
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(
            Router::new()
                .route("/logout", post(handlers::auth::logout))
                .route("/me", get(handlers::user::get_me))
                .layer(from_fn_with_state(
                    state.clone(),
                    middleware::auth_middleware,
                )),
        )
        .with_state(state.clone())
        // Add metrics middleware
        .layer(from_fn(middleware::metrics_middleware))
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        // Add security headers middleware
        .layer(from_fn(security_headers_middleware))
        // Add CORS layer
        .layer(
            CorsLayer::new()
                .allow_origin(
                    state
                        .config
                        .security
                        .allowed_origins
                        .iter()
                        .map(|o| {
                            o.parse::<axum::http::HeaderValue>().unwrap_or_else(|e| {
                                tracing::error!(
                                    "Invalid CORS origin '{}': {}. Using fallback.",
                                    o,
                                    e
                                );
                                axum::http::HeaderValue::from_static("*")
                            })
                        })
                        .collect::<Vec<axum::http::HeaderValue>>(),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                ]),
        );

    Ok(app)
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy")
    ),
    tag = "Observability"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
    }))
}
