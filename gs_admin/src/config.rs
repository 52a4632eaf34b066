//! Admin CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use golf_scoring::{ScoringType, db::DatabaseConfig};

/// Scoring type used by `standings` when `--scoring` is absent
pub const DEFAULT_SCORING_TYPE: ScoringType = ScoringType::Gross;

/// Complete admin configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Scoring type for standings queries without an explicit choice
    pub default_scoring_type: ScoringType,
}

impl AdminConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `database_url_override` - Optional database URL override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if `DEFAULT_SCORING_TYPE` is set to an unknown type
    pub fn from_env(database_url_override: Option<String>) -> Result<Self, ConfigError> {
        let mut database = DatabaseConfig::from_env();
        if let Some(url) = database_url_override {
            database.database_url = url;
        }

        let default_scoring_type = match std::env::var("DEFAULT_SCORING_TYPE") {
            Ok(value) => value.parse().map_err(|reason| ConfigError::Invalid {
                var: "DEFAULT_SCORING_TYPE".to_string(),
                reason,
            })?,
            Err(_) => DEFAULT_SCORING_TYPE,
        };

        Ok(AdminConfig {
            database,
            default_scoring_type,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.database_url.is_empty() {
            return Err(ConfigError::MissingRequired {
                var: "DATABASE_URL".to_string(),
                hint: "e.g. postgres://postgres@localhost/golf_scoring".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Cannot exceed max connections ({})",
                    self.database.max_connections
                ),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}
