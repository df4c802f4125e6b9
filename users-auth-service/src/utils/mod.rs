pub mod password;
pub mod validation;

pub use password::{Password, PasswordHashString, PasswordHasher};
pub use validation::{validate_not_blank, validate_password_strength, ValidatedJson};
