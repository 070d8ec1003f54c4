//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action executed by the binary.

use crate::cli::actions::{server, Action};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;
    let secret_key = matches
        .get_one::<String>("secret-key")
        .cloned()
        .context("missing required argument: --secret-key")?;
    let frontend_base_url = matches
        .get_one::<String>("frontend-base-url")
        .cloned()
        .unwrap_or_else(|| "http://localhost:3000".to_string());

    Ok(Action::Server(Box::new(server::Args {
        port,
        dsn,
        secret_key: SecretString::from(secret_key),
        frontend_base_url,
        access_token_ttl_seconds: matches
            .get_one::<i64>("access-token-ttl-seconds")
            .copied()
            .unwrap_or(7200),
        refresh_token_ttl_seconds: matches
            .get_one::<i64>("refresh-token-ttl-seconds")
            .copied()
            .unwrap_or(604_800),
        email_token_ttl_seconds: matches
            .get_one::<i64>("email-token-ttl-seconds")
            .copied()
            .unwrap_or(259_200),
        session_cache_ttl_seconds: matches
            .get_one::<u64>("session-cache-ttl-seconds")
            .copied()
            .unwrap_or(900),
        email_outbox_poll_seconds: matches
            .get_one::<u64>("email-outbox-poll-seconds")
            .copied()
            .unwrap_or(5),
        email_outbox_batch_size: matches
            .get_one::<usize>("email-outbox-batch-size")
            .copied()
            .unwrap_or(10),
        email_outbox_max_attempts: matches
            .get_one::<u32>("email-outbox-max-attempts")
            .copied()
            .unwrap_or(5),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_action_from_args() {
        temp_env::with_vars(
            [
                ("PHOTOSHARE_DSN", None::<&str>),
                ("PHOTOSHARE_SECRET_KEY", None::<&str>),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec![
                    "photoshare",
                    "--dsn",
                    "postgres://localhost/photoshare",
                    "--secret-key",
                    "sssshhh",
                    "--port",
                    "8443",
                ]);
                let action = handler(&matches);
                assert!(action.is_ok());
                if let Ok(Action::Server(args)) = action {
                    assert_eq!(args.port, 8443);
                    assert_eq!(args.dsn, "postgres://localhost/photoshare");
                    assert_eq!(args.frontend_base_url, "http://localhost:3000");
                    assert_eq!(args.access_token_ttl_seconds, 7200);
                    assert_eq!(args.refresh_token_ttl_seconds, 604_800);
                }
            },
        );
    }
}
