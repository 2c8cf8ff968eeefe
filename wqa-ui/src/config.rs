//! Configuration for wqa-ui
//!
//! Runtime settings come from command-line arguments (each with an environment
//! fallback, see `main.rs`) and are gathered into [`ServiceConfig`]. The
//! provider credential is resolved separately from the environment only; its
//! absence is fatal at startup.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tracing::{info, warn};
use wqa_common::{Error, Result};

use crate::services::gemini_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Environment variables checked for the provider API key, highest priority first
pub const API_KEY_ENV_VARS: [&str; 3] = ["WQA_GEMINI_API_KEY", "GEMINI_API_KEY", "API_KEY"];

pub const DEFAULT_PORT: u16 = 5790;
pub const DEFAULT_SPLASH_MS: u64 = 3000;
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 20;

/// Resolved runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub model: String,
    pub api_base_url: String,
    pub splash_delay: Duration,
    pub analysis_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            splash_delay: Duration::from_millis(DEFAULT_SPLASH_MS),
            analysis_timeout: Duration::from_secs(DEFAULT_ANALYSIS_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::Config("Model name must not be empty".to_string()));
        }
        if self.analysis_timeout.is_zero() {
            return Err(Error::Config("Analysis timeout must be greater than zero".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(Error::Config("Upload limit must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Resolve the provider API key from the environment
///
/// **Priority:** `WQA_GEMINI_API_KEY` → `GEMINI_API_KEY` → `API_KEY`.
/// Blank values count as absent.
pub fn resolve_api_key() -> Result<String> {
    let found: Vec<(&str, String)> = API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| {
            std::env::var(name)
                .ok()
                .filter(|key| is_valid_key(key))
                .map(|key| (*name, key))
        })
        .collect();

    if found.len() > 1 {
        let names: Vec<&str> = found.iter().map(|(name, _)| *name).collect();
        warn!(
            "API key found in multiple environment variables: {}. Using {} (highest priority).",
            names.join(", "),
            names[0]
        );
    }

    match found.into_iter().next() {
        Some((name, key)) => {
            info!("API key loaded from environment variable {}", name);
            Ok(key.trim().to_string())
        }
        None => Err(Error::Config(format!(
            "Inference provider API key not configured. Set one of: {}",
            API_KEY_ENV_VARS.join(", ")
        ))),
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   \t"));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5790");
        assert_eq!(config.splash_delay, Duration::from_secs(3));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ServiceConfig {
            analysis_timeout: Duration::ZERO,
            ..ServiceConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_blank_model_rejected() {
        let config = ServiceConfig {
            model: " ".to_string(),
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
