//! Errors raised while loading `sitewright.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{}`: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed sitewright.toml: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value parsed but is unusable, e.g. `[serve] interface = "localhost"`.
    #[error("invalid setting {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_names_the_file() {
        let err = ConfigError::Io(
            PathBuf::from("site/sitewright.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        assert_eq!(
            err.to_string(),
            "cannot read config file `site/sitewright.toml`: file not found"
        );
    }

    #[test]
    fn test_toml_error_carries_parser_message() {
        let err: ConfigError = toml::from_str::<toml::Value>("port = ").unwrap_err().into();
        let display = err.to_string();
        assert!(display.starts_with("malformed sitewright.toml: "));
        assert!(display.len() > "malformed sitewright.toml: ".len());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation("[serve.port] must not be 0".into());
        assert_eq!(err.to_string(), "invalid setting [serve.port] must not be 0");
    }
}
