pub mod chat;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_rate_limit: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: PathBuf,
    pub chat_table_path: Option<PathBuf>,
}

/// Tuning for query resolution
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of results in ranked mode
    pub top_k: usize,
    /// Minimum cosine similarity for a single-best answer
    pub min_score: f32,
    /// Queries of this many characters or fewer are rejected as too short
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_score: 0.1,
            min_query_len: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub suggested_default: usize,
    pub api_max_limit: usize,
    pub max_request_body_size: usize,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PORT value".to_string()))?;

        let api_rate_limit = std::env::var("API_RATE_LIMIT")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid API_RATE_LIMIT value".to_string()))?;

        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid REQUEST_TIMEOUT_SECS value".to_string()))?;

        let catalog_path = std::env::var("CATALOG_PATH")
            .unwrap_or_else(|_| "./data/indian_food.csv".to_string())
            .into();

        let chat_table_path = std::env::var("CHAT_TABLE_PATH").ok().map(PathBuf::from);

        let top_k = std::env::var("TOP_K")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid TOP_K value".to_string()))?;

        let min_score = std::env::var("MIN_SCORE")
            .unwrap_or_else(|_| "0.1".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MIN_SCORE value".to_string()))?;

        let min_query_len = std::env::var("MIN_QUERY_LEN")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MIN_QUERY_LEN value".to_string()))?;

        let suggested_default = std::env::var("SUGGESTED_DEFAULT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid SUGGESTED_DEFAULT value".to_string()))?;

        let api_max_limit = std::env::var("API_MAX_LIMIT")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid API_MAX_LIMIT value".to_string()))?;

        let max_request_body_size = std::env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| "65536".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MAX_REQUEST_BODY_SIZE value".to_string()))?;

        Ok(Settings {
            server: ServerConfig {
                host,
                port,
                api_rate_limit,
                request_timeout_secs,
            },
            catalog: CatalogConfig {
                path: catalog_path,
                chat_table_path,
            },
            search: SearchConfig {
                top_k,
                min_score,
                min_query_len,
            },
            pagination: PaginationConfig {
                suggested_default,
                api_max_limit,
                max_request_body_size,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(Error::Config(
                "REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        if self.search.top_k == 0 {
            return Err(Error::Config("TOP_K must be at least 1".to_string()));
        }

        if !(0.0..=1.0).contains(&self.search.min_score) {
            return Err(Error::Config(format!(
                "MIN_SCORE must be within [0, 1], got {}",
                self.search.min_score
            )));
        }

        if self.pagination.suggested_default > self.pagination.api_max_limit {
            return Err(Error::Config(
                "SUGGESTED_DEFAULT cannot exceed API_MAX_LIMIT".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> Settings {
        Settings {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                api_rate_limit: 100,
                request_timeout_secs: 10,
            },
            catalog: CatalogConfig {
                path: "/tmp/indian_food.csv".into(),
                chat_table_path: None,
            },
            search: SearchConfig::default(),
            pagination: PaginationConfig {
                suggested_default: 10,
                api_max_limit: 100,
                max_request_body_size: 65536,
            },
        }
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = test_settings();
        assert!(settings.validate().is_ok());

        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_server_limits_validation() {
        let mut settings = test_settings();
        settings.server.request_timeout_secs = 0;
        assert!(matches!(settings.validate(), Err(Error::Config(_))));

        let mut settings = test_settings();
        settings.server.api_rate_limit = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_search_validation() {
        let mut settings = test_settings();
        settings.search.top_k = 0;
        assert!(settings.validate().is_err());

        let mut settings = test_settings();
        settings.search.min_score = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = test_settings();
        settings.pagination.suggested_default = 500;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_search_defaults() {
        let search = SearchConfig::default();
        assert_eq!(search.top_k, 5);
        assert_eq!(search.min_query_len, 3);
        assert!((search.min_score - 0.1).abs() < f32::EPSILON);
    }
}
