//! Configuration module
//!
//! Environment-driven configuration for the generator service. Everything
//! has a sensible default so a bare `cargo run` with a catalog file next to
//! the binary works.

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CATALOG_PATH: &str = "catalog.json";
const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Brand catalog file, re-read at the start of every generation request.
    pub catalog_path: PathBuf,
    /// Parent directory for per-brand workspaces and upload spool dirs.
    pub work_dir: PathBuf,
    pub max_file_size_bytes: usize,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            catalog_path: env::var("CATALOG_PATH")
                .unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string())
                .into(),
            work_dir: env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            environment,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.work_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("WORK_DIR must not be empty"));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_file_size() {
        let config = Config {
            server_port: DEFAULT_PORT,
            catalog_path: DEFAULT_CATALOG_PATH.into(),
            work_dir: env::temp_dir(),
            max_file_size_bytes: 0,
            environment: "development".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config = Config {
            server_port: DEFAULT_PORT,
            catalog_path: DEFAULT_CATALOG_PATH.into(),
            work_dir: env::temp_dir(),
            max_file_size_bytes: 1024,
            environment: "Production".to_string(),
        };
        assert!(config.is_production());
        config.environment = "development".to_string();
        assert!(!config.is_production());
    }
}
