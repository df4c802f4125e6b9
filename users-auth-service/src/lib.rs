pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use service_core::axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use service_core::error::{AppError, Envelope};
use service_core::middleware::tracing::request_id_middleware;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{openapi::security::SecurityScheme, Modify, OpenApi};

use crate::config::AuthConfig;
use crate::dtos::HealthResponse;
use crate::services::AuthService;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::auth::registration::candidate_sign_up,
        handlers::auth::registration::recruiter_sign_up,
        handlers::auth::session::candidate_sign_in,
        handlers::auth::session::recruiter_sign_in,
        handlers::auth::session::refresh_token,
        handlers::auth::session::sign_out,
        handlers::auth::session::verify,
    ),
    components(
        schemas(
            dtos::auth::CandidateSignUpRequest,
            dtos::auth::RecruiterSignUpRequest,
            dtos::auth::SignInRequest,
            dtos::auth::VerifyResponse,
            dtos::auth::HealthResponse,
            models::Role,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Registration", description = "Candidate and recruiter sign-up"),
        (name = "Session", description = "Sign-in, refresh rotation and sign-out"),
        (name = "Observability", description = "Service health"),
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
    pub auth_service: AuthService,
}

pub fn build_router(state: AppState) -> Router {
    let allowed_origins = state
        .config
        .security
        .allowed_origins
        .iter()
        .filter(|origin| {
            let wildcard = origin.as_str() == "*";
            if wildcard {
                tracing::warn!("Ignoring wildcard CORS origin");
            }
            !wildcard
        })
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<HeaderValue>>();

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route("/candidate/sign-up", post(handlers::candidate_sign_up))
        .route("/recruiter/sign-up", post(handlers::recruiter_sign_up))
        .route("/candidate/sign-in", post(handlers::candidate_sign_in))
        .route("/recruiter/sign-in", post(handlers::recruiter_sign_in))
        .route("/refresh-token", post(handlers::refresh_token))
        .route("/sign-out", post(handlers::sign_out))
        .merge(
            Router::new()
                .route("/verify", post(handlers::verify))
                .layer(from_fn_with_state(
                    state.clone(),
                    middleware::require_access_token,
                )),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &service_core::axum::http::Request<_>| {
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
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        )
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Postgres and Redis reachable", body = HealthResponse),
        (status = 500, description = "A backing store is unreachable")
    ),
    tag = "Observability"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<Envelope<HealthResponse>>, AppError> {
    state.auth_service.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Health check failed");
        AppError::from(e)
    })?;

    Ok(Json(Envelope::ok(Some(HealthResponse {
        status: "ok".to_string(),
    }))))
}
