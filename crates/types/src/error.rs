use thiserror::Error;

/// Core error types for stratus time handling
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Frequency is not a positive whole number of hours
    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    /// Timestamp text could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A span was requested over no calendars, or over an empty calendar
    #[error("Cannot compute a date span: {0}")]
    EmptySpan(String),

    /// Date arithmetic left the representable range
    #[error("Timestamp out of range: {0}")]
    OutOfRange(String),
}
