use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::{error, warn};

lazy_static! {
    /// Real Argon2id hash of a password nobody holds. Logins for unknown
    /// usernames are checked against it so they cost the same as a wrong
    /// password.
    static ref DECOY_HASH: String = hash_password("no-account-has-this-password").unwrap_or_default();
}

/// Salted Argon2id hash in PHC string form. Two calls with the same input
/// give different strings.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Recomputes with the embedded salt and parameters. A hash that does not
/// parse simply fails verification.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// Spends one full verification and always reports a mismatch.
pub fn verify_decoy(plain: &str) -> bool {
    let _ = verify_password(plain, &DECOY_HASH);
    false
}
