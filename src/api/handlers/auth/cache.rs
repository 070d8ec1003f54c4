//! In-memory cache mapping access-token hashes to resolved identities.
//!
//! Purely an optimization over the user directory. It is never consulted
//! before the blacklist, and logout removes entries synchronously, so a
//! revoked token can never be served from here.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::directory::Identity;

struct CacheEntry {
    identity: Identity,
    cached_at: Instant,
}

pub struct SessionCache {
    ttl: Duration,
    entries: Mutex<HashMap<Vec<u8>, CacheEntry>>,
}

impl SessionCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a cached identity; expired entries are dropped on read.
    pub async fn get(&self, token_hash: &[u8]) -> Option<Identity> {
        let mut entries = self.entries.lock().await;
        match entries.get(token_hash) {
            Some(entry) if entry.cached_at.elapsed() < self.ttl => Some(entry.identity.clone()),
            Some(_) => {
                entries.remove(token_hash);
                None
            }
            None => None,
        }
    }

    /// Insert an identity, sweeping expired entries opportunistically.
    pub async fn put(&self, token_hash: Vec<u8>, identity: Identity) {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.cached_at.elapsed() < self.ttl);
        entries.insert(
            token_hash,
            CacheEntry {
                identity,
                cached_at: Instant::now(),
            },
        );
    }

    /// Drop a single entry, if present.
    pub async fn invalidate(&self, token_hash: &[u8]) {
        let mut entries = self.entries.lock().await;
        entries.remove(token_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::roles::Role;
    use uuid::Uuid;

    fn identity(email: &str) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: email.to_string(),
            password_hash: "digest".to_string(),
            role: Role::User,
            verified: true,
            active: true,
            refresh_token: None,
        }
    }

    #[tokio::test]
    async fn put_then_get() {
        let cache = SessionCache::new(Duration::from_secs(60));
        cache
            .put(b"hash-a".to_vec(), identity("alice@example.com"))
            .await;

        let hit = cache.get(b"hash-a").await;
        assert_eq!(hit.map(|found| found.email), Some("alice@example.com".to_string()));
        assert!(cache.get(b"hash-b").await.is_none());
    }

    #[tokio::test]
    async fn zero_ttl_expires_immediately() {
        let cache = SessionCache::new(Duration::ZERO);
        cache
            .put(b"hash-a".to_vec(), identity("alice@example.com"))
            .await;
        assert!(cache.get(b"hash-a").await.is_none());
    }

    #[tokio::test]
    async fn invalidate_removes_entry() {
        let cache = SessionCache::new(Duration::from_secs(60));
        cache
            .put(b"hash-a".to_vec(), identity("alice@example.com"))
            .await;
        cache.invalidate(b"hash-a").await;
        assert!(cache.get(b"hash-a").await.is_none());
    }

    #[tokio::test]
    async fn put_sweeps_expired_entries() {
        let cache = SessionCache::new(Duration::ZERO);
        cache
            .put(b"hash-a".to_vec(), identity("alice@example.com"))
            .await;
        cache
            .put(b"hash-b".to_vec(), identity("bob@example.com"))
            .await;

        let entries = cache.entries.lock().await;
        assert_eq!(entries.len(), 1);
    }
}
