use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::auth::{CandidateSignUpRequest, RecruiterSignUpRequest},
    models::{AuthenticatedUser, NewCandidate, NewRecruiter, NewUser, Role, TokenKind, TokenPair},
    services::{CredentialStore, ServiceError, SessionStore, TokenCodec},
    utils::{Password, PasswordHashString, PasswordHasher},
};

/// Orchestrates sign-up, sign-in, refresh and sign-out.
///
/// Holds no per-request state; the stores are the only mutable state and are
/// shared behind `Arc`, so a clone can serve any number of concurrent requests.
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
    tokens: TokenCodec,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        tokens: TokenCodec,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            credentials,
            sessions,
            tokens,
            hasher,
        }
    }

    pub async fn sign_up_candidate(&self, req: CandidateSignUpRequest) -> Result<(), ServiceError> {
        validate(&req)?;
        self.ensure_login_available(&req.login).await?;

        let password_hash = self.hash_password(req.password).await?;

        let candidate = NewCandidate {
            user: NewUser {
                login: req.login,
                password_hash,
                first_name: req.first_name,
                last_name: req.last_name,
            },
            resume: req.resume,
            current_position: req.current_position,
            bio: req.bio,
            education: req.education,
            skills: req.skills,
        };

        self.credentials.register_candidate(&candidate).await?;

        tracing::info!(login = %candidate.user.login, "Candidate registered");
        Ok(())
    }

    pub async fn sign_up_recruiter(&self, req: RecruiterSignUpRequest) -> Result<(), ServiceError> {
        validate(&req)?;
        self.ensure_login_available(&req.login).await?;

        let password_hash = self.hash_password(req.password).await?;

        let recruiter = NewRecruiter {
            user: NewUser {
                login: req.login,
                password_hash,
                first_name: req.first_name,
                last_name: req.last_name,
            },
            company_name: req.company_name,
        };

        self.credentials.register_recruiter(&recruiter).await?;

        tracing::info!(
            login = %recruiter.user.login,
            company = %recruiter.company_name,
            "Recruiter registered"
        );
        Ok(())
    }

    /// Absent login, wrong password and missing role profile are all `WrongCredential`.
    pub async fn sign_in(
        &self,
        login: &str,
        password: &str,
        role: Role,
    ) -> Result<TokenPair, ServiceError> {
        let credential = match self.credentials.find_credential(login).await {
            Ok(credential) => credential,
            Err(ServiceError::WrongCredential) => {
                self.verify_decoy(Password::new(password.to_string())).await?;
                tracing::warn!(role = %role, "Sign-in failed: unknown login");
                return Err(ServiceError::WrongCredential);
            }
            Err(e) => return Err(e),
        };

        let password = Password::new(password.to_string());
        if !self.verify_password(password, credential.password_hash).await? {
            tracing::warn!(
                user_public_id = %credential.public_id,
                role = %role,
                "Sign-in failed: password mismatch"
            );
            return Err(ServiceError::WrongCredential);
        }

        if !self
            .credentials
            .profile_exists(credential.public_id, role)
            .await?
        {
            tracing::warn!(
                user_public_id = %credential.public_id,
                role = %role,
                "Sign-in failed: no profile for role"
            );
            return Err(ServiceError::WrongCredential);
        }

        let pair = self.generate_tokens(credential.public_id, role).await?;
        tracing::info!(user_public_id = %credential.public_id, role = %role, "Signed in");
        Ok(pair)
    }

    /// Rotates the session: the presented refresh token must be the one stored.
    ///
    /// The stored value is overwritten, not compared-and-swapped, so two
    /// concurrent refreshes with the same token can both succeed; the later
    /// write decides which new refresh token stays valid.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<TokenPair, ServiceError> {
        let claims = self.tokens.decode(TokenKind::Refresh, refresh_token)?;
        let public_id = claims.user_public_id;

        let stored = self.sessions.get_refresh_token(public_id).await.map_err(|e| {
            tracing::warn!(user_public_id = %public_id, error = %e, "No active session for refresh");
            e
        })?;

        if stored != refresh_token {
            tracing::warn!(
                user_public_id = %public_id,
                "Refresh token does not match the active session"
            );
            return Err(ServiceError::TokenExpired);
        }

        self.sessions.unset_refresh_token(public_id).await?;

        let pair = self.generate_tokens(public_id, claims.role).await?;
        tracing::info!(user_public_id = %public_id, role = %claims.role, "Session refreshed");
        Ok(pair)
    }

    /// Ends the session of the access token's identity. Repeating it is a no-op.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), ServiceError> {
        let user = self.verify_access_token(access_token)?;
        self.sessions.unset_refresh_token(user.public_id).await?;
        tracing::info!(user_public_id = %user.public_id, role = %user.role, "Signed out");
        Ok(())
    }

    /// Stateless check: signature and expiry only, no store round trip.
    pub fn verify_access_token(&self, access_token: &str) -> Result<AuthenticatedUser, ServiceError> {
        let claims = self.tokens.decode(TokenKind::Access, access_token)?;
        Ok(AuthenticatedUser {
            public_id: claims.user_public_id,
            role: claims.role,
        })
    }

    pub async fn health_check(&self) -> Result<(), ServiceError> {
        self.credentials.health_check().await?;
        self.sessions.health_check().await
    }

    /// Mints both tokens and stores the refresh half. If storing fails no pair is returned.
    async fn generate_tokens(&self, public_id: Uuid, role: Role) -> Result<TokenPair, ServiceError> {
        let access = self.tokens.issue(TokenKind::Access, public_id, role)?;
        let refresh = self.tokens.issue(TokenKind::Refresh, public_id, role)?;

        self.sessions.set_refresh_token(&refresh).await.map_err(|e| {
            tracing::error!(user_public_id = %public_id, error = %e, "Failed to store refresh token");
            e
        })?;

        Ok(TokenPair { access, refresh })
    }

    async fn ensure_login_available(&self, login: &str) -> Result<(), ServiceError> {
        if self.credentials.login_taken(login).await? {
            tracing::warn!(login = %login, "Sign-up rejected: login already registered");
            return Err(ServiceError::UsernameExists);
        }
        Ok(())
    }

    async fn hash_password(&self, password: String) -> Result<PasswordHashString, ServiceError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&Password::new(password)))
            .await
            .map_err(|e| ServiceError::internal("Password hashing task failed", e))?
            .map_err(|e| {
                tracing::error!(error = %e, "Could not hash password");
                ServiceError::Internal(e)
            })
    }

    async fn verify_password(
        &self,
        password: Password,
        password_hash: PasswordHashString,
    ) -> Result<bool, ServiceError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| ServiceError::internal("Password verification task failed", e))
    }

    async fn verify_decoy(&self, password: Password) -> Result<bool, ServiceError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify_decoy(&password))
            .await
            .map_err(|e| ServiceError::internal("Password verification task failed", e))
    }
}

fn validate<T: Validate>(req: &T) -> Result<(), ServiceError> {
    req.validate()
        .map_err(|e| ServiceError::InvalidInput(e.to_string()))
}
