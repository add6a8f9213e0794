use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::estimate::pricing::{
    DetailedPricing, MoveSizeCatalog, PricingPolicy, PricingPolicyKind, RateCardError,
    RateCardImporter,
};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the estimate service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub estimate: EstimateConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let show_targets = env::var("APP_LOG_TARGETS")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let raw_policy =
            env::var("ESTIMATE_PRICING_POLICY").unwrap_or_else(|_| "detailed".to_string());
        let pricing_policy = PricingPolicyKind::parse(&raw_policy)
            .ok_or(ConfigError::InvalidPricingPolicy { value: raw_policy })?;
        let rate_card_path = env::var("ESTIMATE_RATE_CARD")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                show_targets,
            },
            estimate: EstimateConfig {
                pricing_policy,
                rate_card_path,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub show_targets: bool,
}

/// Which pricing formula quotes are produced with, and where its size table
/// comes from.
#[derive(Debug, Clone, Default)]
pub struct EstimateConfig {
    pub pricing_policy: PricingPolicyKind,
    /// CSV overriding the detailed size table.
    pub rate_card_path: Option<PathBuf>,
}

impl EstimateConfig {
    pub fn build_policy(&self) -> Result<(Arc<dyn PricingPolicy>, MoveSizeCatalog), RateCardError> {
        match (self.pricing_policy, &self.rate_card_path) {
            (PricingPolicyKind::Detailed, Some(path)) => {
                let (card, catalog) = RateCardImporter::from_path(path)?;
                Ok((Arc::new(DetailedPricing::new(card)), catalog))
            }
            (PricingPolicyKind::Flat, Some(path)) => {
                warn!(
                    path = %path.display(),
                    "rate card ignored: only the detailed policy reads one"
                );
                Ok((self.pricing_policy.build(), MoveSizeCatalog::standard()))
            }
            (kind, None) => Ok((kind.build(), MoveSizeCatalog::standard())),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPricingPolicy { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPricingPolicy { value } => write!(
                f,
                "ESTIMATE_PRICING_POLICY must be 'detailed' or 'flat' (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidPricingPolicy { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_TARGETS",
            "ESTIMATE_PRICING_POLICY",
            "ESTIMATE_RATE_CARD",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(!config.telemetry.show_targets);
        assert_eq!(config.estimate.pricing_policy, PricingPolicyKind::Detailed);
        assert!(config.estimate.rate_card_path.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_pricing_policy_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ESTIMATE_PRICING_POLICY", "simple");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.estimate.pricing_policy, PricingPolicyKind::Flat);

        env::set_var("ESTIMATE_PRICING_POLICY", "hourly");
        let error = AppConfig::load().expect_err("unknown policy is rejected");
        assert!(matches!(
            error,
            ConfigError::InvalidPricingPolicy { ref value } if value == "hourly"
        ));
        reset_env();
    }

    #[test]
    fn build_policy_without_rate_card_uses_standard_tables() {
        let config = EstimateConfig::default();
        let (policy, catalog) = config.build_policy().expect("standard policy builds");
        assert_eq!(policy.kind(), PricingPolicyKind::Detailed);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn build_policy_reports_missing_rate_card() {
        let config = EstimateConfig {
            pricing_policy: PricingPolicyKind::Detailed,
            rate_card_path: Some(PathBuf::from("/nonexistent/rate-card.csv")),
        };
        assert!(matches!(config.build_policy(), Err(RateCardError::Io(_))));
    }
}
