pub mod registration;
pub mod session;

pub use registration::{candidate_sign_up, recruiter_sign_up};
pub use session::{candidate_sign_in, recruiter_sign_in, refresh_token, sign_out, verify};
