use std::env;

/// Runtime configuration for the portal backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listening port (default: 5000)
    pub port: u16,

    /// Directory uploaded files are stored in (default: "uploads")
    pub upload_dir: String,

    /// Maximum file size in bytes (default: 10 MiB)
    pub max_file_size: usize,

    /// Seeded admin account email
    pub admin_email: String,

    /// Seeded admin account password
    pub admin_password: String,

    /// Shared secret gating admin signup
    pub signup_secret: String,

    /// Session token time-to-live in hours (default: 24)
    pub token_ttl_hours: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            upload_dir: "uploads".to_string(),
            max_file_size: 10 * 1024 * 1024, // 10 MiB
            admin_email: "admin@studyportal.local".to_string(),
            admin_password: "admin123".to_string(),
            signup_secret: "change-me".to_string(),
            token_ttl_hours: 24,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to the
    /// documented defaults. The defaults are fine for local development and
    /// unsafe for anything else.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            upload_dir: env::var("UPLOAD_DIR").unwrap_or(default.upload_dir),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            admin_email: env::var("ADMIN_EMAIL").unwrap_or(default.admin_email),

            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(default.admin_password),

            signup_secret: env::var("ADMIN_SIGNUP_SECRET").unwrap_or(default.signup_secret),

            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.token_ttl_hours),
        }
    }
}
