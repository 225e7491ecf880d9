//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so production logs can be
//! grepped and monitored by category.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - GEN_xxx: Generation/collection errors
//! - XLS_xxx: Spreadsheet serialization errors
//! - API_xxx: API errors
//! - CFG_xxx: Configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Generation Errors (1xx)
    // ============================================
    /// Requested batch exceeds the passport capacity bound
    GenCapacityExceeded,

    // ============================================
    // Spreadsheet Errors (2xx)
    // ============================================
    /// Workbook serialization failed
    XlsxBuildFailed,

    // ============================================
    // API Errors (3xx)
    // ============================================
    /// Count query param missing, non-numeric, or non-positive
    ApiInvalidCount,
    /// Blocking worker task failed to complete
    ApiWorkerFailed,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Configuration Errors (4xx)
    // ============================================
    /// Invalid port value in environment
    CfgInvalidPort,
    /// Invalid max count value in environment
    CfgInvalidMaxCount,

    // ============================================
    // Generic Errors (9xx)
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // Generation Errors
            Self::GenCapacityExceeded => "GEN_CAPACITY_EXCEEDED",

            // Spreadsheet Errors
            Self::XlsxBuildFailed => "XLS_BUILD_FAILED",

            // API Errors
            Self::ApiInvalidCount => "API_INVALID_COUNT",
            Self::ApiWorkerFailed => "API_WORKER_FAILED",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            // Configuration Errors
            Self::CfgInvalidPort => "CFG_INVALID_PORT",
            Self::CfgInvalidMaxCount => "CFG_INVALID_MAX_COUNT",

            // Generic
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiInvalidCount => 400,
            Self::ApiRateLimited => 429,
            _ => 500,
        }
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Requested count exceeds the safe passport-space fraction
    pub fn capacity_exceeded(requested: usize, bound: usize) -> Self {
        Self::new(
            ErrorCode::GenCapacityExceeded,
            format!(
                "Requested {} records but the passport space only supports {} per batch",
                requested, bound
            ),
        )
    }

    /// Count query param rejected
    pub fn invalid_count(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInvalidCount, msg)
    }

    /// Workbook serialization failed
    pub fn xlsx_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::with_source(ErrorCode::XlsxBuildFailed, "Workbook serialization failed", source)
    }

    /// Blocking worker join failure
    pub fn worker_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiWorkerFailed, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::xlsx_failed(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "JSON serialization error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::capacity_exceeded(5_000_000, 3_000_000);
        assert_eq!(err.code, ErrorCode::GenCapacityExceeded);
        assert_eq!(err.code_str(), "GEN_CAPACITY_EXCEEDED");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::ApiInvalidCount.http_status(), 400);
        assert_eq!(ErrorCode::ApiRateLimited.http_status(), 429);
        assert_eq!(ErrorCode::XlsxBuildFailed.http_status(), 500);
    }

    #[test]
    fn test_display_includes_code() {
        let err = AppError::invalid_count("count must be positive");
        let text = err.to_string();
        assert!(text.contains("API_INVALID_COUNT"));
        assert!(text.contains("count must be positive"));
    }
}
