pub mod auth;

pub use auth::{
    CandidateSignUpRequest, HealthResponse, RecruiterSignUpRequest, SignInRequest, VerifyResponse,
};
