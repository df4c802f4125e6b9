#![allow(dead_code)]

use std::sync::Arc;

use service_core::config::Config as CoreConfig;
use users_auth_service::{
    build_router,
    config::{
        AuthConfig, DatabaseConfig, Environment, PasswordConfig, RedisConfig, SecurityConfig,
        TokenConfig, TokenSettings,
    },
    dtos::{CandidateSignUpRequest, RecruiterSignUpRequest},
    services::{AuthService, InMemoryCredentialStore, InMemorySessionStore, TokenCodec},
    utils::PasswordHasher,
    AppState,
};

pub const PASSWORD: &str = "Abcdef1!";

pub struct TestApp {
    pub config: AuthConfig,
    pub auth: AuthService,
    pub credentials: Arc<InMemoryCredentialStore>,
    pub sessions: Arc<InMemorySessionStore>,
}

impl TestApp {
    pub fn router(&self) -> axum::Router {
        build_router(AppState {
            config: self.config.clone(),
            auth_service: self.auth.clone(),
        })
    }
}

pub fn test_config() -> AuthConfig {
    AuthConfig {
        common: CoreConfig { port: 8080 },
        environment: Environment::Dev,
        service_name: "users-auth-service-test".to_string(),
        log_level: "error".to_string(),
        database: DatabaseConfig {
            url: "postgres://localhost/users_auth_test".to_string(),
            max_connections: 2,
            min_connections: 1,
            timeout_seconds: 5,
        },
        redis: RedisConfig {
            url: "redis://127.0.0.1:6379".to_string(),
            timeout_seconds: 2,
        },
        token: TokenConfig {
            access: TokenSettings {
                secret: "test-access-secret".to_string(),
                ttl_seconds: 900,
                domain: "localhost".to_string(),
            },
            refresh: TokenSettings {
                secret: "test-refresh-secret".to_string(),
                ttl_seconds: 3600,
                domain: "localhost".to_string(),
            },
        },
        password: PasswordConfig {
            hash_cost: 1,
            memory_kib: 1024,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}

pub fn setup() -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("error")
        .try_init();

    let config = test_config();
    let credentials = Arc::new(InMemoryCredentialStore::new());
    let sessions = Arc::new(InMemorySessionStore::new());
    let hasher = PasswordHasher::new(&config.password).expect("Failed to build password hasher");
    let auth = AuthService::new(
        credentials.clone(),
        sessions.clone(),
        TokenCodec::new(&config.token),
        hasher,
    );

    TestApp {
        config,
        auth,
        credentials,
        sessions,
    }
}

pub fn candidate(login: &str, skills: &[&str]) -> CandidateSignUpRequest {
    CandidateSignUpRequest {
        login: login.to_string(),
        password: PASSWORD.to_string(),
        first_name: "Alice".to_string(),
        last_name: "Smith".to_string(),
        resume: "cv.pdf".to_string(),
        current_position: "Backend engineer".to_string(),
        bio: "Likes databases".to_string(),
        education: "BSc".to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn recruiter(login: &str, company: &str) -> RecruiterSignUpRequest {
    RecruiterSignUpRequest {
        login: login.to_string(),
        password: PASSWORD.to_string(),
        first_name: "Bob".to_string(),
        last_name: "Jones".to_string(),
        company_name: company.to_string(),
    }
}
