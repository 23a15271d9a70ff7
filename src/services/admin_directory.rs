use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use dashmap::DashMap;

struct AdminRecord {
    /// Email in the case the admin registered with
    email: String,
    password_hash: String,
}

/// In-memory directory of admin accounts, keyed by lowercased email.
/// Passwords are stored as salted argon2 hashes, never in the clear.
pub struct AdminDirectory {
    admins: DashMap<String, AdminRecord>,
}

impl AdminDirectory {
    pub fn new() -> Self {
        Self {
            admins: DashMap::new(),
        }
    }

    /// Hashes the password and inserts the record keyed by lowercased email.
    pub fn add(&self, email: &str, password: &str) -> Result<()> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("password hashing failed: {}", e))?
            .to_string();

        self.admins.insert(
            email.to_lowercase(),
            AdminRecord {
                email: email.to_string(),
                password_hash,
            },
        );
        Ok(())
    }

    pub fn contains(&self, email: &str) -> bool {
        self.admins.contains_key(&email.to_lowercase())
    }

    /// Checks credentials and returns the stored email on success. Unknown
    /// email and wrong password are indistinguishable to the caller.
    pub fn verify(&self, email: &str, password: &str) -> Option<String> {
        let record = self.admins.get(&email.to_lowercase())?;

        let parsed_hash = PasswordHash::new(&record.password_hash).ok()?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .ok()?;

        Some(record.email.clone())
    }
}

impl Default for AdminDirectory {
    fn default() -> Self {
        Self::new()
    }
}
