use service_core::{
    axum::{extract::State, http::StatusCode, response::IntoResponse, Json},
    error::{AppError, Envelope},
};

use crate::{
    dtos::auth::{CandidateSignUpRequest, RecruiterSignUpRequest},
    utils::ValidatedJson,
    AppState,
};

/// Register a candidate with profile and skills
#[utoipa::path(
    post,
    path = "/candidate/sign-up",
    request_body = CandidateSignUpRequest,
    responses(
        (status = 201, description = "Candidate registered"),
        (status = 400, description = "Invalid input or password format"),
        (status = 409, description = "Login already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Registration"
)]
pub async fn candidate_sign_up(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CandidateSignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.sign_up_candidate(req).await?;
    Ok((StatusCode::CREATED, Json(Envelope::<()>::ok(None))))
}

/// Register a recruiter and attach them to a company
#[utoipa::path(
    post,
    path = "/recruiter/sign-up",
    request_body = RecruiterSignUpRequest,
    responses(
        (status = 201, description = "Recruiter registered"),
        (status = 400, description = "Invalid input or password format"),
        (status = 409, description = "Login already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Registration"
)]
pub async fn recruiter_sign_up(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RecruiterSignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.sign_up_recruiter(req).await?;
    Ok((StatusCode::CREATED, Json(Envelope::<()>::ok(None))))
}
