//! Configuration module
//!
//! All tunables come from the environment with documented defaults. Missing
//! variables fall back; malformed variables are startup errors rather than
//! silent defaults.
//!
//! Variables:
//!   PORT / PINFL_PORT  - listening port (default: 3000)
//!   PINFL_HOST         - bind host (default: 0.0.0.0)
//!   PINFL_MAX_COUNT    - per-request row ceiling (default: 100000)
//!   PINFL_STATIC_DIR   - frontend directory (default: static)

use std::path::PathBuf;

use tracing::warn;

use crate::error::{AppError, AppResult, ErrorCode};
use crate::generator::MAX_SAFE_COUNT;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Listening port
    pub port: u16,

    /// Per-request row ceiling; counts above it are clamped down
    pub max_count: usize,

    /// Directory the static frontend is served from
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Default listening port
    pub const DEFAULT_PORT: u16 = 3000;

    /// Default per-request ceiling
    pub const DEFAULT_MAX_COUNT: usize = 100_000;

    /// Load configuration from the environment.
    ///
    /// `PORT` wins over `PINFL_PORT` (platforms like Railway inject `PORT`).
    pub fn from_env() -> AppResult<Self> {
        let port_var = std::env::var("PORT")
            .or_else(|_| std::env::var("PINFL_PORT"))
            .ok();
        let port = parse_port(port_var.as_deref())?;

        let max_var = std::env::var("PINFL_MAX_COUNT").ok();
        let max_count = parse_max_count(max_var.as_deref())?;

        let host = std::env::var("PINFL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let static_dir = std::env::var("PINFL_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        Ok(Self {
            host,
            port,
            max_count,
            static_dir,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: Self::DEFAULT_PORT,
            max_count: Self::DEFAULT_MAX_COUNT,
            static_dir: PathBuf::from("static"),
        }
    }
}

/// Parse a port value, defaulting when unset
fn parse_port(value: Option<&str>) -> AppResult<u16> {
    match value {
        None => Ok(ServerConfig::DEFAULT_PORT),
        Some(raw) => raw.parse().map_err(|_| {
            AppError::new(
                ErrorCode::CfgInvalidPort,
                format!("Invalid port value: {:?}", raw),
            )
        }),
    }
}

/// Parse the request ceiling, defaulting when unset and clamping to the
/// passport capacity bound so a misconfigured ceiling cannot reach the
/// degenerate region of the retry loop.
fn parse_max_count(value: Option<&str>) -> AppResult<usize> {
    let max_count: usize = match value {
        None => ServerConfig::DEFAULT_MAX_COUNT,
        Some(raw) => raw.parse().map_err(|_| {
            AppError::new(
                ErrorCode::CfgInvalidMaxCount,
                format!("Invalid max count value: {:?}", raw),
            )
        })?,
    };

    if max_count == 0 {
        return Err(AppError::new(
            ErrorCode::CfgInvalidMaxCount,
            "Max count must be positive",
        ));
    }

    if max_count > MAX_SAFE_COUNT {
        warn!(
            "PINFL_MAX_COUNT {} exceeds the capacity bound, clamping to {}",
            max_count, MAX_SAFE_COUNT
        );
        return Ok(MAX_SAFE_COUNT);
    }

    Ok(max_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_defaults_when_unset() {
        assert_eq!(parse_port(None).unwrap(), 3000);
    }

    #[test]
    fn test_malformed_port_is_an_error() {
        let err = parse_port(Some("not-a-port")).unwrap_err();
        assert_eq!(err.code, ErrorCode::CfgInvalidPort);
    }

    #[test]
    fn test_max_count_defaults_when_unset() {
        assert_eq!(parse_max_count(None).unwrap(), 100_000);
    }

    #[test]
    fn test_max_count_clamped_to_capacity_bound() {
        assert_eq!(parse_max_count(Some("999999999")).unwrap(), MAX_SAFE_COUNT);
    }

    #[test]
    fn test_zero_max_count_rejected() {
        let err = parse_max_count(Some("0")).unwrap_err();
        assert_eq!(err.code, ErrorCode::CfgInvalidMaxCount);
    }
}
