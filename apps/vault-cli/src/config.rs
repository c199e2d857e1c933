//! CLI configuration.

use std::env;
use std::path::PathBuf;

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the record collection is persisted under.
    pub data_dir: PathBuf,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        let data_dir = env::var("USERVAULT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        Self {
            data_dir,
            log_level: env::var("USERVAULT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

fn default_data_dir() -> PathBuf {
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".uservault"))
        .unwrap_or_else(|_| PathBuf::from(".uservault"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_override() {
        // SAFETY: Tests run serially or in isolation
        unsafe {
            env::set_var("USERVAULT_DATA_DIR", "/tmp/uservault-test");
        }

        let config = Config::from_env();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/uservault-test"));

        unsafe {
            env::remove_var("USERVAULT_DATA_DIR");
        }
    }
}
