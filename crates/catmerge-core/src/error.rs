//! Error types for catmerge operations.
//!
//! Every failure surfaces to the caller immediately. The only lenient path in the
//! crate is the pick weight accessor, which never produces an error.

use thiserror::Error;

/// Result type alias for catmerge operations.
pub type CatmergeResult<T> = Result<T, CatmergeError>;

/// Main error type for all catmerge operations.
#[derive(Error, Debug)]
pub enum CatmergeError {
    /// An event has no usable preferred origin (time, latitude and longitude).
    #[error("Event '{event_id}' has no usable preferred origin: {reason}")]
    MissingOrigin {
        event_id: String,
        reason: &'static str,
        code: ErrorCode,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Catalog content could not be decoded.
    #[error("Catalog error{}: {message}", line_suffix(.line))]
    Catalog {
        message: String,
        line: Option<u64>,
        code: ErrorCode,
    },

    /// The merge was cancelled before every reference event was processed.
    #[error("Merge cancelled after {processed} reference events")]
    Cancelled { processed: usize },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn line_suffix(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Origin (ORG_xxx)
    OrgMissing,
    OrgMissingTime,
    OrgMissingLocation,

    // Configuration (CFG_xxx)
    CfgInvalid,

    // Catalog (CAT_xxx)
    CatInvalidLine,
    CatInvalidEvent,

    // Run control
    Cancelled,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::OrgMissing => "ORG_001",
            ErrorCode::OrgMissingTime => "ORG_002",
            ErrorCode::OrgMissingLocation => "ORG_003",
            ErrorCode::CfgInvalid => "CFG_001",
            ErrorCode::CatInvalidLine => "CAT_001",
            ErrorCode::CatInvalidEvent => "CAT_002",
            ErrorCode::Cancelled => "RUN_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl CatmergeError {
    /// Create a missing-origin error for an event without a preferred origin.
    pub fn missing_origin(event_id: impl Into<String>) -> Self {
        Self::MissingOrigin {
            event_id: event_id.into(),
            reason: "no preferred origin",
            code: ErrorCode::OrgMissing,
        }
    }

    /// Create a missing-origin error for an origin without a time.
    pub fn missing_origin_time(event_id: impl Into<String>) -> Self {
        Self::MissingOrigin {
            event_id: event_id.into(),
            reason: "origin time is undefined",
            code: ErrorCode::OrgMissingTime,
        }
    }

    /// Create a missing-origin error for an origin without latitude or longitude.
    pub fn missing_origin_location(event_id: impl Into<String>) -> Self {
        Self::MissingOrigin {
            event_id: event_id.into(),
            reason: "origin latitude or longitude is undefined",
            code: ErrorCode::OrgMissingLocation,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a catalog error tied to a line of the input.
    pub fn catalog_line(line: u64, message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
            line: Some(line),
            code: ErrorCode::CatInvalidLine,
        }
    }

    /// Create a catalog error about an event as a whole.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
            line: None,
            code: ErrorCode::CatInvalidEvent,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingOrigin { code, .. } => *code,
            Self::Catalog { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::CfgInvalid,
            Self::Cancelled { .. } => ErrorCode::Cancelled,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::MissingOrigin { .. } => {
                Some("Every event in both catalogs needs a preferred origin with time, latitude and longitude")
            }
            Self::Configuration(_) => Some("Please check the configuration file keys and values"),
            Self::Catalog { .. } => Some("Each catalog line must be one JSON-encoded event"),
            _ => None,
        }
    }
}
