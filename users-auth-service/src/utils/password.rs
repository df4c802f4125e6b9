use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::PasswordConfig;

/// Newtype for password to prevent accidental logging
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([redacted])")
    }
}

/// Newtype for password hash
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHashString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHashString([redacted])")
    }
}

/// Argon2id hasher with the cost fixed at construction.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    decoy_hash: PasswordHashString,
}

impl PasswordHasher {
    pub fn new(config: &PasswordConfig) -> Result<Self, anyhow::Error> {
        let params = Params::new(config.memory_kib, config.hash_cost, 1, None)
            .map_err(|e| anyhow::anyhow!("Invalid password hashing parameters: {}", e))?;

        let mut hasher = Self {
            params,
            decoy_hash: PasswordHashString::new(String::new()),
        };
        let decoy_password = Password::new(SaltString::generate(&mut OsRng).as_str().to_string());
        hasher.decoy_hash = hasher.hash(&decoy_password)?;
        Ok(hasher)
    }

    /// Runs a full verification against a hash no password matches, so an
    /// unknown login costs the same as a wrong password.
    pub fn verify_decoy(&self, password: &Password) -> bool {
        self.verify(password, &self.decoy_hash)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt.
    ///
    /// The salt and parameters are encoded into the PHC string, so verification
    /// keeps working for hashes produced under an older cost setting.
    pub fn hash(&self, password: &Password) -> Result<PasswordHashString, anyhow::Error> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2()
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        Ok(PasswordHashString::new(password_hash))
    }

    /// Constant-time verification. A malformed hash is a mismatch, never an error.
    pub fn verify(&self, password: &Password, password_hash: &PasswordHashString) -> bool {
        let parsed_hash = match PasswordHash::new(password_hash.as_str()) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        self.argon2()
            .verify_password(password.as_str().as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&PasswordConfig {
            hash_cost: 1,
            memory_kib: 1024,
        })
        .expect("Failed to build hasher")
    }

    #[test]
    fn test_hash_password() {
        let password = Password::new("Abcdef1!".to_string());
        let hash = hasher().hash(&password).expect("Failed to hash password");

        assert!(hash.as_str().starts_with("$argon2id"));
        assert!(!hash.as_str().contains("Abcdef1!"));
    }

    #[test]
    fn test_verify_password_correct_and_incorrect() {
        let hasher = hasher();
        let password = Password::new("Abcdef1!".to_string());
        let hash = hasher.hash(&password).expect("Failed to hash password");

        assert!(hasher.verify(&password, &hash));
        assert!(!hasher.verify(&Password::new("Abcdef1?".to_string()), &hash));
        assert!(!hasher.verify(&Password::new(String::new()), &hash));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hasher = hasher();
        let password = Password::new("Abcdef1!".to_string());
        let hash1 = hasher.hash(&password).expect("Failed to hash password");
        let hash2 = hasher.hash(&password).expect("Failed to hash password");

        assert_ne!(hash1, hash2);
        assert!(hasher.verify(&password, &hash1));
        assert!(hasher.verify(&password, &hash2));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        let password = Password::new("Abcdef1!".to_string());
        let bogus = PasswordHashString::new("not-a-phc-string".to_string());
        assert!(!hasher().verify(&password, &bogus));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::new("Abcdef1!".to_string());
        assert!(!format!("{:?}", password).contains("Abcdef1!"));
    }

    #[test]
    fn test_decoy_hash_never_matches() {
        let hasher = hasher();
        assert!(PasswordHash::new(hasher.decoy_hash.as_str()).is_ok());
        assert!(hasher.decoy_hash.as_str().starts_with("$argon2id$v=19$m=1024,t=1"));
        assert!(!hasher.verify_decoy(&Password::new("Abcdef1!".to_string())));
        assert!(!hasher.verify_decoy(&Password::new(String::new())));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = PasswordHasher::new(&PasswordConfig {
            hash_cost: 0,
            memory_kib: 1024,
        });
        assert!(result.is_err());
    }
}
