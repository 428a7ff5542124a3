use std::env;
use std::path::PathBuf;

/// Runtime configuration for the complaints API
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection URL (default: "sqlite://complaints.db?mode=rwc")
    pub database_url: String,

    /// Maximum pooled database connections (default: 10)
    pub db_max_connections: u32,

    /// Directory that holds uploaded attachments (default: "uploads")
    pub upload_dir: PathBuf,

    /// Maximum request body size in bytes, attachments included (default: 10 MB)
    pub max_upload_size: usize,

    /// Allowed CORS origins, comma separated in the environment. "*" allows any.
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://complaints.db?mode=rwc".to_string(),
            db_max_connections: 10,
            upload_dir: PathBuf::from("uploads"),
            max_upload_size: 10 * 1024 * 1024, // 10 MB
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.db_max_connections),

            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| parse_origins(&v))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(default.allowed_origins),
        }
    }

    /// In-memory database and a local upload directory
    pub fn development() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            upload_dir: PathBuf::from("uploads"),
            max_upload_size: 10 * 1024 * 1024,
            allowed_origins: vec!["*".to_string()],
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
