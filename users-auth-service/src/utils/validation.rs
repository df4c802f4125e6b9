use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::{Validate, ValidationError};

pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const WRONG_PASSWORD_FORMAT: &str = "WRONG_PASSWORD_FORMAT";

/// JSON body extractor that also runs `validator` rules.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse request body");
            AppError::BadRequest(anyhow::anyhow!(INVALID_INPUT))
        })?;

        value.validate().map_err(|e| {
            if e.field_errors().contains_key("password") {
                tracing::warn!("Password does not meet the format requirements");
                AppError::BadRequest(anyhow::anyhow!(WRONG_PASSWORD_FORMAT))
            } else {
                tracing::warn!(error = %e, "Request validation failed");
                AppError::ValidationError(e)
            }
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Rejects values that are empty once surrounding whitespace is trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Password must mix upper case, lower case, a digit and a punctuation or symbol character.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_number = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_uppercase() {
            has_upper = true;
        } else if c.is_lowercase() {
            has_lower = true;
        } else if c.is_numeric() {
            has_number = true;
        } else if c.is_ascii_punctuation() || (!c.is_alphanumeric() && !c.is_whitespace()) {
            has_special = true;
        }
    }

    if has_upper && has_lower && has_number && has_special {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(
            "Password must contain upper case, lower case, number and special characters".into(),
        );
        Err(err)
    }
}
