//! Runtime settings for the server binary.

use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_PATH: &str = "./db.sqlite";
pub const DEFAULT_PUBLIC_DIR: &str = "./public";
/// Form posts are small; anything above this is rejected before parsing.
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite image rewritten after every mutation.
    pub database_path: PathBuf,
    /// Served under `/public`.
    pub public_dir: PathBuf,
    pub body_limit: usize,
}

impl AppConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}
