use anyhow::{Context, Result};
use validator::ValidationError;

/// Special characters accepted by the password policy.
const SPECIAL_CHARS: &str = "!@#$%^&*";

/// Matches the cost the registration flow has always used.
const BCRYPT_COST: u32 = 10;

/// One-way, salted, cost-factored hash of a plaintext password.
pub fn hash_password(plain: &str) -> Result<String> {
    bcrypt::hash(plain, BCRYPT_COST).context("Failed to hash password")
}

/// Compare a plaintext password against a stored bcrypt hash.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(plain, hash).context("Failed to verify password")
}

/// Password policy: 8-16 characters with at least one uppercase letter and
/// at least one of `!@#$%^&*`.
pub fn password_meets_policy(password: &str) -> bool {
    let len = password.chars().count();
    if !(8..=16).contains(&len) {
        return false;
    }
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_special = password.chars().any(|c| SPECIAL_CHARS.contains(c));
    has_uppercase && has_special
}

/// `validator`-compatible wrapper around the password policy, used on
/// request structs.
pub fn validate_password_policy(password: &str) -> Result<(), ValidationError> {
    if password_meets_policy(password) {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_policy");
        error.message =
            Some("Password must be 8-16 chars, include uppercase and special char".into());
        Err(error)
    }
}
