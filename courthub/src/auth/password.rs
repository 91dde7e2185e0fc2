use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::{HubError, HubResult};

/// Hashes a plain password into an argon2id PHC string.
pub fn hash_password(plain: &str) -> HubResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| HubError::internal(format!("failed to hash password: {err}")))
}

/// Checks `plain` against a stored PHC string. A malformed stored hash never
/// matches.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok(),
        Err(err) => {
            log::warn!("stored password hash is not a valid PHC string: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original() {
        let hash = hash_password("smash123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("smash123", &hash));
        assert!(!verify_password("drop-shot", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash_password("smash123").unwrap(), hash_password("smash123").unwrap());
    }

    #[test]
    fn garbage_hash_never_matches() {
        assert!(!verify_password("smash123", "plain-text"));
    }
}
