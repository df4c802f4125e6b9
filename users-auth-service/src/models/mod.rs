pub mod role;
pub mod token;
pub mod user;

pub use role::Role;
pub use token::{AuthenticatedUser, IssuedToken, TokenClaims, TokenKind, TokenPair};
pub use user::{normalize_skills, NewCandidate, NewRecruiter, NewUser, StoredCredential};
