//! Account and session endpoints plus the auth core behind them.

pub mod blacklist;
pub mod cache;
pub mod directory;
pub mod error;
pub mod hashing;
pub mod login;
pub mod messages;
pub mod rate_limit;
pub mod refresh;
pub mod roles;
pub mod service;
pub mod signup;
pub mod state;
pub mod token;
pub mod types;
pub(crate) mod utils;
pub mod verification;

pub use blacklist::{spawn_blacklist_pruner, PgTokenStore, TokenStore};
pub use directory::{Identity, PgUserDirectory, UserDirectory};
pub use error::AuthError;
pub use rate_limit::{NoopRateLimiter, RateLimiter};
pub use roles::Role;
pub use service::AuthService;
pub use state::AuthConfig;

use crate::api::email::OutboxMailer;
use std::sync::Arc;

/// Concrete service wired at startup and shared with handlers via `Extension`.
pub type SharedAuth = Arc<AuthService<PgUserDirectory, PgTokenStore, OutboxMailer>>;
