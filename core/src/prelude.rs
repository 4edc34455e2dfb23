use std::time::Duration;

/// Rejected operator edit. The store keeps its prior value when this is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unknown parameter `{0}`")]
    UnknownField(String),
    #[error("{field}: `{input}` is not a number")]
    NotANumber { field: &'static str, input: String },
    #[error("{field}: value must be finite")]
    NonFinite { field: &'static str },
    #[error("{field}: {value} is not a whole number")]
    NotAnInteger { field: &'static str, value: f64 },
    #[error("{field}: {value} outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// A single inbound event payload that could not be decoded.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MessageParseError {
    #[error("invalid payload: {0}")]
    InvalidJson(String),
    #[error("unknown agent status {0}")]
    UnknownStatus(u8),
}

/// Failure of the subscription itself. Always terminal for the connection.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("stream dropped: {0}")]
    Dropped(String),
    #[error("stream ended by server")]
    Ended,
}

pub type ValidationResult<T> = Result<T, ValidationError>;
