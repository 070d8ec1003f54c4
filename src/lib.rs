//! # Photoshare (REST API backend)
//!
//! `photoshare` is the backend for a photo sharing application. This crate
//! carries the account and session core: registration with email
//! verification, password login, JWT access/refresh token pairs, token
//! revocation, and role-aware protected routes.
//!
//! ## Authentication
//!
//! Passwords are stored as salted argon2id digests and never leave the
//! server. Tokens are HS256 JWTs scoped by purpose (`access_token`,
//! `refresh_token`, `email_token`); a token presented for the wrong purpose
//! is rejected outright.
//!
//! ## Sessions
//!
//! Logout puts the SHA-256 of the access token on a database blacklist so
//! revocation survives restarts. Resolved identities are cached in-process
//! with a short TTL; the blacklist is always consulted before the cache.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
