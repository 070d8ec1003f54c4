//! Auth orchestration: registration, login, resolution, rotation, revocation.
//!
//! The service is generic over its storage and delivery seams so the whole
//! flow runs against in-memory fakes in tests. Handlers only ever talk to
//! this type; status-code mapping stays in the handler layer.

use std::time::Duration;
use tracing::error;

use super::blacklist::TokenStore;
use super::cache::SessionCache;
use super::directory::{Identity, InsertOutcome, NewIdentity, UserDirectory};
use super::error::AuthError;
use super::hashing;
use super::state::AuthConfig;
use super::token::{now_unix_seconds, token_hash, TokenCodec, TokenScope};
use super::utils::{build_verify_url, normalize_email};

/// Access/refresh pair returned by login and refresh.
#[derive(Clone, Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Outcome of an email-confirmation attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    AlreadyConfirmed,
}

/// Outcome of a request to (re)send the verification email.
#[derive(Debug, PartialEq, Eq)]
pub enum VerificationRequest {
    Sent,
    AlreadyConfirmed,
}

/// Delivery seam for verification emails. The service logs failures and
/// never propagates them into the calling request.
#[allow(async_fn_in_trait)]
pub trait VerificationMailer: Send + Sync {
    async fn send_verification_email(
        &self,
        to_email: &str,
        username: &str,
        verify_url: &str,
    ) -> anyhow::Result<()>;
}

pub struct AuthService<D, S, M> {
    config: AuthConfig,
    codec: TokenCodec,
    cache: SessionCache,
    directory: D,
    blacklist: S,
    mailer: M,
}

impl<D, S, M> AuthService<D, S, M>
where
    D: UserDirectory,
    S: TokenStore,
    M: VerificationMailer,
{
    #[must_use]
    pub fn new(config: AuthConfig, directory: D, blacklist: S, mailer: M) -> Self {
        let codec = TokenCodec::new(config.secret_key());
        let cache = SessionCache::new(Duration::from_secs(config.session_cache_ttl_seconds()));
        Self {
            config,
            codec,
            cache,
            directory,
            blacklist,
            mailer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Create a new identity and queue its verification email.
    ///
    /// # Errors
    /// `AlreadyExists` on a duplicate email (case-insensitive).
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<Identity, AuthError> {
        let email = normalize_email(email);
        let password_hash = hashing::hash(password).map_err(AuthError::Unavailable)?;
        let outcome = self
            .directory
            .insert(NewIdentity {
                username: username.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        let identity = match outcome {
            InsertOutcome::Created(identity) => identity,
            InsertOutcome::Conflict => return Err(AuthError::AlreadyExists),
        };

        self.queue_verification_email(&identity).await;
        Ok(identity)
    }

    /// Verify credentials and issue a fresh token pair.
    ///
    /// Checks run in a fixed order so each failure has one stable answer:
    /// unknown email, then unverified, then banned, then bad password.
    ///
    /// # Errors
    /// One of `UnknownIdentity`, `NotVerified`, `Inactive`, `BadCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let email = normalize_email(email);
        let identity = self
            .directory
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UnknownIdentity)?;

        if !identity.verified {
            return Err(AuthError::NotVerified);
        }
        if !identity.active {
            return Err(AuthError::Inactive);
        }
        if !hashing::verify(password, &identity.password_hash) {
            return Err(AuthError::BadCredentials);
        }

        self.issue_pair(&identity).await
    }

    /// Resolve the identity behind a bearer access token.
    ///
    /// Order matters: scope/signature/expiry first, then the blacklist, and
    /// only then the cache; the cache can never resurrect a revoked token.
    ///
    /// # Errors
    /// `InvalidToken` for any token problem, `Inactive` for banned identities.
    pub async fn resolve_current_identity(&self, access_token: &str) -> Result<Identity, AuthError> {
        let claims = self.codec.decode_scoped(access_token, TokenScope::Access)?;
        let hash = token_hash(access_token);

        if self.blacklist.is_revoked(&hash).await? {
            return Err(AuthError::InvalidToken);
        }

        if let Some(identity) = self.cache.get(&hash).await {
            if !identity.active {
                return Err(AuthError::Inactive);
            }
            return Ok(identity);
        }

        let identity = self
            .directory
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::UnknownIdentity)?;
        if !identity.active {
            return Err(AuthError::Inactive);
        }

        self.cache.put(hash, identity.clone()).await;
        Ok(identity)
    }

    /// Rotate a refresh token into a fresh pair.
    ///
    /// A presented token that is not the currently stored one clears the
    /// stored value and fails closed; the holder must log in again.
    ///
    /// # Errors
    /// `InvalidToken` on scope, signature, expiry, or rotation mismatch.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.codec.decode_scoped(refresh_token, TokenScope::Refresh)?;
        let identity = self
            .directory
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if identity.refresh_token.as_deref() != Some(refresh_token) {
            self.directory.update_refresh_token(identity.id, None).await?;
            return Err(AuthError::InvalidToken);
        }

        self.issue_pair(&identity).await
    }

    /// Revoke an access token. Unconditional and idempotent: unknown,
    /// expired, and already-revoked tokens all land in the blacklist.
    ///
    /// # Errors
    /// `Unavailable` only; revocation itself cannot fail a caller.
    pub async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        let hash = token_hash(access_token);

        // Retention needs the natural expiry; fall back to a full access TTL
        // for tokens we cannot decode at all.
        let expires_at = match self.codec.decode_ignoring_expiry(access_token) {
            Ok(claims) => claims.exp,
            Err(_) => now_unix_seconds() + self.config.access_token_ttl_seconds(),
        };

        self.blacklist.revoke(&hash, expires_at).await?;
        self.cache.invalidate(&hash).await;
        Ok(())
    }

    /// Issue a fresh email token and hand it to the delivery collaborator.
    ///
    /// # Errors
    /// `UnknownIdentity` if no account exists for the email.
    pub async fn request_email_verification(
        &self,
        email: &str,
    ) -> Result<VerificationRequest, AuthError> {
        let email = normalize_email(email);
        let identity = self
            .directory
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UnknownIdentity)?;

        if identity.verified {
            return Ok(VerificationRequest::AlreadyConfirmed);
        }

        self.queue_verification_email(&identity).await;
        Ok(VerificationRequest::Sent)
    }

    /// Flip the verification flag for the subject of an email token.
    /// Confirming twice reports `AlreadyConfirmed` instead of failing.
    ///
    /// # Errors
    /// `InvalidToken` for bad tokens, `VerificationError` if the subject
    /// no longer exists.
    pub async fn confirm_email(&self, token: &str) -> Result<Confirmation, AuthError> {
        let claims = self
            .codec
            .decode_scoped(token, TokenScope::EmailVerification)?;
        let identity = self
            .directory
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::VerificationError)?;

        if identity.verified {
            return Ok(Confirmation::AlreadyConfirmed);
        }

        self.directory.set_verified(identity.id).await?;
        Ok(Confirmation::Confirmed)
    }

    async fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, AuthError> {
        let access_token = self.codec.issue(
            &identity.email,
            TokenScope::Access,
            self.config.access_token_ttl_seconds(),
        )?;
        let refresh_token = self.codec.issue(
            &identity.email,
            TokenScope::Refresh,
            self.config.refresh_token_ttl_seconds(),
        )?;

        self.directory
            .update_refresh_token(identity.id, Some(&refresh_token))
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    async fn queue_verification_email(&self, identity: &Identity) {
        let token = match self.codec.issue(
            &identity.email,
            TokenScope::EmailVerification,
            self.config.email_token_ttl_seconds(),
        ) {
            Ok(token) => token,
            Err(err) => {
                error!("failed to issue verification token: {err}");
                return;
            }
        };

        let verify_url = build_verify_url(self.config.frontend_base_url(), &token);
        if let Err(err) = self
            .mailer
            .send_verification_email(&identity.email, &identity.username, &verify_url)
            .await
        {
            // Delivery is at-least-once via the outbox; a failed enqueue only
            // costs the user a resend.
            error!("failed to queue verification email: {err:#}");
        }
    }
}
