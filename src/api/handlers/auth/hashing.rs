//! Password hashing built on argon2id.
//!
//! Digests embed the algorithm, parameters, and a per-password random salt,
//! so verification needs nothing beyond the stored string.

use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand::{rngs::OsRng, RngCore};

fn generate_salt() -> Result<SaltString> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("Failed to generate salt")?;
    SaltString::encode_b64(&bytes).map_err(|err| anyhow!("Failed to encode salt: {err}"))
}

/// Hash a plaintext password into a self-describing argon2id digest.
///
/// # Errors
/// Returns an error if the system RNG or the hasher fails.
pub fn hash(password: &str) -> Result<String> {
    let salt = generate_salt()?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|digest| digest.to_string())
        .map_err(|err| anyhow!("Failed to hash password: {err}"))
}

/// Verify a plaintext against a stored digest.
///
/// A malformed digest verifies as `false` rather than erroring, so a
/// corrupted row behaves like a wrong password.
#[must_use]
pub fn verify(password: &str, digest: &str) -> bool {
    PasswordHash::new(digest)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() -> Result<()> {
        let digest = hash("correct horse battery staple")?;
        assert!(verify("correct horse battery staple", &digest));
        assert!(!verify("correct horse battery", &digest));
        Ok(())
    }

    #[test]
    fn distinct_salts_produce_distinct_digests() -> Result<()> {
        let first = hash("hunter2")?;
        let second = hash("hunter2")?;
        assert_ne!(first, second);
        assert!(verify("hunter2", &first));
        assert!(verify("hunter2", &second));
        Ok(())
    }

    #[test]
    fn malformed_digest_verifies_false() {
        assert!(!verify("anything", "not-a-phc-string"));
        assert!(!verify("anything", ""));
    }
}
