use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;

const TOKEN_LEN: usize = 48;

/// Set of currently valid opaque session tokens.
///
/// Validity is computed lazily from the issuance timestamp instead of a
/// per-token timer, so logout never races a pending expiry. Expired entries
/// are dropped by the `verify` call that observes them.
pub struct TokenStore {
    tokens: DashMap<String, DateTime<Utc>>,
    ttl: Duration,
}

impl TokenStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            tokens: DashMap::new(),
            ttl,
        }
    }

    /// Mints a fresh opaque token and records its issuance time.
    pub fn issue(&self) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();

        self.tokens.insert(token.clone(), Utc::now());
        token
    }

    /// True iff the token is present and younger than the TTL.
    pub fn verify(&self, token: &str) -> bool {
        let Some(issued_at) = self.tokens.get(token).map(|e| *e.value()) else {
            return false;
        };

        if Utc::now() - issued_at < self.ttl {
            true
        } else {
            self.tokens.remove(token);
            false
        }
    }

    /// Removes the token. Idempotent; revoking an unknown token is a no-op.
    pub fn revoke(&self, token: &str) {
        self.tokens.remove(token);
    }
}
