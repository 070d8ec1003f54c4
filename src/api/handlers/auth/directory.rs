//! User records and the directory seam backing authentication.

use anyhow::{Context, Result};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use super::roles::Role;
use super::utils::is_unique_violation;

/// A registered account as seen by the auth flows.
#[derive(Clone, Debug)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub verified: bool,
    pub active: bool,
    pub refresh_token: Option<String>,
}

/// Input for creating a new identity. The password is already hashed.
#[derive(Clone, Debug)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Outcome of an insert attempt.
#[derive(Debug)]
pub enum InsertOutcome {
    Created(Identity),
    Conflict,
}

/// Repository seam for identity records.
#[allow(async_fn_in_trait)]
pub trait UserDirectory: Send + Sync {
    /// Look up by email. Comparison is case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>>;

    /// Insert a new identity. The first identity in the system gets the
    /// admin role; a duplicate email yields `Conflict`, never an error.
    async fn insert(&self, new_identity: NewIdentity) -> Result<InsertOutcome>;

    /// Overwrite the stored refresh token (`None` clears it).
    async fn update_refresh_token(&self, id: Uuid, refresh_token: Option<&str>) -> Result<()>;

    /// Mark the identity's email as confirmed.
    async fn set_verified(&self, id: Uuid) -> Result<()>;
}

pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserDirectory for PgUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        let query = "SELECT id, username, email, password_hash, role, is_verified, is_active, \
                     refresh_token FROM users WHERE LOWER(email) = LOWER($1)";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to look up identity by email")?;

        row.map(|row| identity_from_row(&row)).transpose()
    }

    async fn insert(&self, new_identity: NewIdentity) -> Result<InsertOutcome> {
        // The first row ever inserted becomes the admin; the subquery and the
        // insert run in one statement so two racing signups cannot both win.
        let query = "INSERT INTO users (username, email, password_hash, role) \
                     VALUES ($1, $2, $3, \
                     CASE WHEN (SELECT COUNT(*) FROM users) = 0 THEN 'admin' ELSE 'user' END) \
                     RETURNING id, username, email, password_hash, role, is_verified, is_active, \
                     refresh_token";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(&new_identity.username)
            .bind(&new_identity.email)
            .bind(&new_identity.password_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(InsertOutcome::Created(identity_from_row(&row)?)),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Conflict),
            Err(err) => Err(err).context("failed to insert identity"),
        }
    }

    async fn update_refresh_token(&self, id: Uuid, refresh_token: Option<&str>) -> Result<()> {
        let query = "UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE id = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(id)
            .bind(refresh_token)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to update refresh token")?;
        Ok(())
    }

    async fn set_verified(&self, id: Uuid) -> Result<()> {
        let query = "UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE id = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(id)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to mark identity verified")?;
        Ok(())
    }
}

/// List registered identities for moderation views, newest first.
///
/// # Errors
/// Returns an error if the query fails or a row is malformed.
pub async fn list_identities(pool: &PgPool, limit: i64) -> Result<Vec<Identity>> {
    let query = "SELECT id, username, email, password_hash, role, is_verified, is_active, \
                 refresh_token FROM users ORDER BY created_at DESC LIMIT $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(limit)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list identities")?;

    rows.iter().map(identity_from_row).collect()
}

fn identity_from_row(row: &PgRow) -> Result<Identity> {
    let role_text: String = row.try_get("role").context("missing role column")?;
    let role = Role::parse(&role_text)
        .with_context(|| format!("unknown role stored for identity: {role_text}"))?;

    Ok(Identity {
        id: row.try_get("id").context("missing id column")?,
        username: row.try_get("username").context("missing username column")?,
        email: row.try_get("email").context("missing email column")?,
        password_hash: row
            .try_get("password_hash")
            .context("missing password_hash column")?,
        role,
        verified: row
            .try_get("is_verified")
            .context("missing is_verified column")?,
        active: row
            .try_get("is_active")
            .context("missing is_active column")?,
        refresh_token: row
            .try_get("refresh_token")
            .context("missing refresh_token column")?,
    })
}
