use std::env;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::ConfigError;

/// Marketplace policy knobs for the request/quote lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// When set, a provider may hold at most one quote per request.
    /// Off by default: providers may revise by submitting again.
    pub single_quote_per_provider: bool,
    /// Age in hours after which an open, unquoted request earns a
    /// "refine your criteria" nudge.
    pub refine_nudge_hours: i64,
    /// Categories seeded into site settings on first start. Admins may
    /// extend the list at runtime.
    pub default_categories: Vec<String>,
}

impl MarketplaceConfig {
    /// Load marketplace configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - MARKET_SINGLE_QUOTE_PER_PROVIDER: "true"/"false" (defaults to false)
    /// - MARKET_REFINE_NUDGE_HOURS: hours before the refinement nudge (defaults to 24)
    /// - MARKET_DEFAULT_CATEGORIES: comma-separated category names
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading marketplace configuration from environment variables");

        let single_quote_per_provider = env::var("MARKET_SINGLE_QUOTE_PER_PROVIDER")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let refine_nudge_hours = env::var("MARKET_REFINE_NUDGE_HOURS")
            .unwrap_or_else(|_| {
                warn!("MARKET_REFINE_NUDGE_HOURS not set, using default: 24");
                "24".to_string()
            })
            .parse::<i64>()
            .map_err(|_| {
                error!("Invalid MARKET_REFINE_NUDGE_HOURS value");
                ConfigError::InvalidValue("Invalid MARKET_REFINE_NUDGE_HOURS value".to_string())
            })?;

        let default_categories = env::var("MARKET_DEFAULT_CATEGORIES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| Self::builtin_categories());

        let config = MarketplaceConfig {
            single_quote_per_provider,
            refine_nudge_hours,
            default_categories,
        };

        config.validate()?;
        info!("Marketplace configuration loaded successfully");
        Ok(config)
    }

    fn builtin_categories() -> Vec<String> {
        vec![
            "Visa Services".to_string(),
            "Business Setup".to_string(),
            "Travel Packages".to_string(),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refine_nudge_hours <= 0 {
            error!("Refine nudge window must be greater than 0 hours");
            return Err(ConfigError::ValidationError(
                "MARKET_REFINE_NUDGE_HOURS must be greater than 0".to_string(),
            ));
        }
        if self.default_categories.is_empty() {
            return Err(ConfigError::ValidationError(
                "Default category list cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        MarketplaceConfig {
            single_quote_per_provider: false,
            refine_nudge_hours: 24,
            default_categories: Self::builtin_categories(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MarketplaceConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.single_quote_per_provider);
        assert_eq!(config.refine_nudge_hours, 24);
        assert_eq!(config.default_categories.len(), 3);
    }

    #[test]
    fn test_zero_nudge_window_rejected() {
        let mut config = MarketplaceConfig::default();
        config.refine_nudge_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_categories_rejected() {
        let mut config = MarketplaceConfig::default();
        config.default_categories.clear();
        assert!(config.validate().is_err());
    }
}
