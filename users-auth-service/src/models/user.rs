//! Registration models - what the credential store persists in one transaction.

use uuid::Uuid;

use crate::utils::PasswordHashString;

/// Base identity row plus the credential that will point at it.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub password_hash: PasswordHashString,
    pub first_name: String,
    pub last_name: String,
}

/// Everything written for one candidate sign-up.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub user: NewUser,
    pub resume: String,
    pub current_position: String,
    pub bio: String,
    pub education: String,
    pub skills: Vec<String>,
}

/// Everything written for one recruiter sign-up.
#[derive(Debug, Clone)]
pub struct NewRecruiter {
    pub user: NewUser,
    pub company_name: String,
}

/// Result of a credential lookup by login.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub public_id: Uuid,
    pub password_hash: PasswordHashString,
}

/// Trims and deduplicates skill names, preserving first-seen order.
pub fn normalize_skills(skills: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_string()))
        .map(str::to_string)
        .collect()
}
