use axum_extra::extract::cookie::{Cookie, CookieJar};
use service_core::{
    axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        Json,
    },
    error::{AppError, Envelope},
};

use crate::{
    config::TokenSettings,
    dtos::auth::{SignInRequest, VerifyResponse},
    middleware::{access_token_from_headers, AuthUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE},
    models::{IssuedToken, Role, TokenPair},
    services::ServiceError,
    utils::ValidatedJson,
    AppState,
};

const ACCESS_TOKEN_PATH: &str = "/";
const REFRESH_TOKEN_PATH: &str = "/refresh-token";

fn token_cookie(
    name: &'static str,
    path: &'static str,
    token: &IssuedToken,
    settings: &TokenSettings,
) -> Cookie<'static> {
    let mut builder = Cookie::build((name, token.value.clone()))
        .path(path)
        .http_only(true)
        .secure(true)
        .max_age(time::Duration::seconds(token.ttl.as_secs() as i64));
    if !settings.domain.is_empty() {
        builder = builder.domain(settings.domain.clone());
    }
    builder.build()
}

fn expired_cookie(
    name: &'static str,
    path: &'static str,
    settings: &TokenSettings,
) -> Cookie<'static> {
    let mut builder = Cookie::build((name, ""))
        .path(path)
        .http_only(true)
        .secure(true)
        .max_age(time::Duration::ZERO);
    if !settings.domain.is_empty() {
        builder = builder.domain(settings.domain.clone());
    }
    builder.build()
}

fn with_session_cookies(state: &AppState, jar: CookieJar, pair: &TokenPair) -> CookieJar {
    let token = &state.config.token;
    jar.add(token_cookie(
        ACCESS_TOKEN_COOKIE,
        ACCESS_TOKEN_PATH,
        &pair.access,
        &token.access,
    ))
    .add(token_cookie(
        REFRESH_TOKEN_COOKIE,
        REFRESH_TOKEN_PATH,
        &pair.refresh,
        &token.refresh,
    ))
}

async fn sign_in_as(
    state: AppState,
    jar: CookieJar,
    req: SignInRequest,
    role: Role,
) -> Result<(CookieJar, Json<Envelope<()>>), AppError> {
    let pair = state
        .auth_service
        .sign_in(&req.login, &req.password, role)
        .await?;
    let jar = with_session_cookies(&state, jar, &pair);
    Ok((jar, Json(Envelope::ok(None))))
}

/// Sign in as a candidate
#[utoipa::path(
    post,
    path = "/candidate/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in; access_token and refresh_token cookies set"),
        (status = 400, description = "Invalid input or password format"),
        (status = 401, description = "Wrong credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session"
)]
pub async fn candidate_sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    sign_in_as(state, jar, req, Role::Candidate).await
}

/// Sign in as a recruiter
#[utoipa::path(
    post,
    path = "/recruiter/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in; access_token and refresh_token cookies set"),
        (status = 400, description = "Invalid input or password format"),
        (status = 401, description = "Wrong credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session"
)]
pub async fn recruiter_sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    sign_in_as(state, jar, req, Role::Recruiter).await
}

/// Rotate the session using the refresh_token cookie
#[utoipa::path(
    post,
    path = "/refresh-token",
    responses(
        (status = 200, description = "Session rotated; both cookies replaced"),
        (status = 401, description = "Invalid or expired refresh token"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let presented = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ServiceError::InvalidToken)?;

    let pair = state.auth_service.refresh_session(&presented).await?;
    let jar = with_session_cookies(&state, jar, &pair);
    Ok((jar, Json(Envelope::<()>::ok(None))))
}

/// End the session of the presented access token and clear both cookies
#[utoipa::path(
    post,
    path = "/sign-out",
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Invalid access token"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session",
    security(("bearer_auth" = []))
)]
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let token = access_token_from_headers(&headers).ok_or(ServiceError::InvalidToken)?;
    state.auth_service.sign_out(&token).await?;

    let settings = &state.config.token;
    let jar = jar
        .add(expired_cookie(ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_PATH, &settings.access))
        .add(expired_cookie(REFRESH_TOKEN_COOKIE, REFRESH_TOKEN_PATH, &settings.refresh));
    Ok((StatusCode::OK, jar, Json(Envelope::<()>::ok(None))))
}

/// Identity and role behind the access token
#[utoipa::path(
    post,
    path = "/verify",
    responses(
        (status = 200, description = "Access token is valid", body = VerifyResponse),
        (status = 401, description = "Invalid or expired access token")
    ),
    tag = "Session",
    security(("bearer_auth" = []))
)]
pub async fn verify(user: AuthUser) -> Json<Envelope<VerifyResponse>> {
    let AuthUser(user) = user;
    Json(Envelope::ok(Some(VerifyResponse {
        user_public_id: user.public_id,
        role: user.role,
    })))
}
