use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Role;
use crate::utils::{validate_not_blank, validate_password_strength};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CandidateSignUpRequest {
    #[validate(
        length(min = 1, max = 255, message = "Login is required"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "alice")]
    pub login: String,

    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "Abcdef1!")]
    pub password: String,

    #[validate(
        length(min = 1, max = 255, message = "First name is required"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Alice")]
    pub first_name: String,

    #[validate(
        length(min = 1, max = 255, message = "Last name is required"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Smith")]
    pub last_name: String,

    #[serde(default)]
    pub resume: String,

    #[serde(default)]
    #[schema(example = "Backend engineer")]
    pub current_position: String,

    #[serde(default)]
    pub bio: String,

    #[serde(default)]
    pub education: String,

    #[serde(default)]
    #[schema(example = json!(["go", "sql"]))]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecruiterSignUpRequest {
    #[validate(
        length(min = 1, max = 255, message = "Login is required"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "bob")]
    pub login: String,

    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "Abcdef1!")]
    pub password: String,

    #[validate(
        length(min = 1, max = 255, message = "First name is required"),
        custom(function = "validate_not_blank")
    )]
    pub first_name: String,

    #[validate(
        length(min = 1, max = 255, message = "Last name is required"),
        custom(function = "validate_not_blank")
    )]
    pub last_name: String,

    #[validate(
        length(min = 1, max = 255, message = "Company name is required"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Acme")]
    pub company_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "Login is required"))]
    #[schema(example = "alice")]
    pub login: String,

    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "Abcdef1!")]
    pub password: String,
}

/// Identity behind a verified access token.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub user_public_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}
