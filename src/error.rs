use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Date text does not match the expected expression: {0:?}")]
    #[diagnostic(
        code(lecture_sync::grammar_mismatch),
        help("expected `Дата: <day> <month>, HH:MM - HH:MM`")
    )]
    GrammarMismatch(String),

    #[error("Unknown month name: {0:?}")]
    #[diagnostic(code(lecture_sync::unknown_month))]
    UnknownMonth(String),

    #[error("Date text describes an impossible date or time range: {0:?}")]
    #[diagnostic(code(lecture_sync::invalid_date))]
    InvalidDate(String),

    #[error("Cannot pair {0} fragments into lectures")]
    #[diagnostic(
        code(lecture_sync::odd_fragment_count),
        help("the extractor must emit name/date pairs")
    )]
    OddFragmentCount(usize),

    #[error("Extracted {found} fragments but {expected} were needed")]
    #[diagnostic(code(lecture_sync::truncated_extraction))]
    TruncatedExtraction { expected: usize, found: usize },

    #[error("Course page has no <title>")]
    #[diagnostic(code(lecture_sync::missing_title))]
    MissingTitle,

    #[error("Failed to fetch course page: {0}")]
    #[diagnostic(code(lecture_sync::fetch))]
    Fetch(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(lecture_sync::google_calendar))]
    GoogleCalendar(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(lecture_sync::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(lecture_sync::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(lecture_sync::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(lecture_sync::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(lecture_sync::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type SyncResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create page fetch errors
pub fn fetch_error(message: &str) -> Error {
    Error::Fetch(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
