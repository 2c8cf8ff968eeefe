//! Common error types for WQA

use thiserror::Error;

/// Common result type for WQA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across WQA crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = Error::Config("Analysis timeout must be greater than zero".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: Analysis timeout must be greater than zero"
        );
    }
}
