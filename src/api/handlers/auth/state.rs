//! Auth configuration, built once at startup and shared immutably.

use secrecy::SecretString;

const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 2 * 60 * 60;
const DEFAULT_REFRESH_TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_EMAIL_TOKEN_TTL_SECONDS: i64 = 3 * 24 * 60 * 60;
const DEFAULT_SESSION_CACHE_TTL_SECONDS: u64 = 15 * 60;
const DEFAULT_BLACKLIST_PRUNE_INTERVAL_SECONDS: u64 = 10 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    secret_key: SecretString,
    frontend_base_url: String,
    access_token_ttl_seconds: i64,
    refresh_token_ttl_seconds: i64,
    email_token_ttl_seconds: i64,
    session_cache_ttl_seconds: u64,
    blacklist_prune_interval_seconds: u64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(secret_key: SecretString, frontend_base_url: String) -> Self {
        Self {
            secret_key,
            frontend_base_url,
            access_token_ttl_seconds: DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            refresh_token_ttl_seconds: DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
            email_token_ttl_seconds: DEFAULT_EMAIL_TOKEN_TTL_SECONDS,
            session_cache_ttl_seconds: DEFAULT_SESSION_CACHE_TTL_SECONDS,
            blacklist_prune_interval_seconds: DEFAULT_BLACKLIST_PRUNE_INTERVAL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_access_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.access_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_refresh_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.refresh_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_email_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.email_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_session_cache_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_cache_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_blacklist_prune_interval_seconds(mut self, seconds: u64) -> Self {
        self.blacklist_prune_interval_seconds = seconds;
        self
    }

    #[must_use]
    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub const fn access_token_ttl_seconds(&self) -> i64 {
        self.access_token_ttl_seconds
    }

    #[must_use]
    pub const fn refresh_token_ttl_seconds(&self) -> i64 {
        self.refresh_token_ttl_seconds
    }

    #[must_use]
    pub const fn email_token_ttl_seconds(&self) -> i64 {
        self.email_token_ttl_seconds
    }

    #[must_use]
    pub const fn session_cache_ttl_seconds(&self) -> u64 {
        self.session_cache_ttl_seconds
    }

    #[must_use]
    pub const fn blacklist_prune_interval_seconds(&self) -> u64 {
        self.blacklist_prune_interval_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_builders() {
        let config = AuthConfig::new(
            SecretString::from("sssshhh"),
            "http://localhost:3000".to_string(),
        );
        assert_eq!(config.access_token_ttl_seconds(), 7200);
        assert_eq!(config.refresh_token_ttl_seconds(), 604_800);
        assert_eq!(config.email_token_ttl_seconds(), 259_200);
        assert_eq!(config.session_cache_ttl_seconds(), 900);
        assert_eq!(config.blacklist_prune_interval_seconds(), 600);

        let config = config
            .with_access_token_ttl_seconds(60)
            .with_refresh_token_ttl_seconds(120)
            .with_email_token_ttl_seconds(180)
            .with_session_cache_ttl_seconds(5)
            .with_blacklist_prune_interval_seconds(30);
        assert_eq!(config.access_token_ttl_seconds(), 60);
        assert_eq!(config.refresh_token_ttl_seconds(), 120);
        assert_eq!(config.email_token_ttl_seconds(), 180);
        assert_eq!(config.session_cache_ttl_seconds(), 5);
        assert_eq!(config.blacklist_prune_interval_seconds(), 30);
    }

    #[test]
    fn secret_key_debug_is_redacted() {
        let config = AuthConfig::new(
            SecretString::from("sssshhh"),
            "http://localhost:3000".to_string(),
        );
        let debug = format!("{config:?}");
        assert!(!debug.contains("sssshhh"));
    }
}
