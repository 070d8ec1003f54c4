use crate::api;
use crate::api::handlers::auth::AuthConfig;
use anyhow::{anyhow, Result};
use secrecy::SecretString;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub secret_key: SecretString,
    pub frontend_base_url: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub email_token_ttl_seconds: i64,
    pub session_cache_ttl_seconds: u64,
    pub email_outbox_poll_seconds: u64,
    pub email_outbox_batch_size: usize,
    pub email_outbox_max_attempts: u32,
}

/// Execute the server action.
///
/// # Errors
/// Returns an error if the configuration is inconsistent or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    if args.access_token_ttl_seconds <= 0 || args.refresh_token_ttl_seconds <= 0 {
        return Err(anyhow!("Token TTLs must be positive"));
    }

    // Access tokens must age out before the refresh token that renews them.
    if args.access_token_ttl_seconds >= args.refresh_token_ttl_seconds {
        return Err(anyhow!(
            "Access token TTL must be shorter than refresh token TTL"
        ));
    }

    let auth_config = AuthConfig::new(args.secret_key, args.frontend_base_url)
        .with_access_token_ttl_seconds(args.access_token_ttl_seconds)
        .with_refresh_token_ttl_seconds(args.refresh_token_ttl_seconds)
        .with_email_token_ttl_seconds(args.email_token_ttl_seconds)
        .with_session_cache_ttl_seconds(args.session_cache_ttl_seconds);

    let email_config = api::email::EmailWorkerConfig::new()
        .with_poll_interval_seconds(args.email_outbox_poll_seconds)
        .with_batch_size(args.email_outbox_batch_size)
        .with_max_attempts(args.email_outbox_max_attempts);

    api::new(args.port, args.dsn, auth_config, email_config).await
}
