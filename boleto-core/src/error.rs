//! Error types for the boleto engine

use thiserror::Error;

/// Result type for boleto operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boleto errors
#[derive(Error, Debug)]
pub enum Error {
    /// Argument outside its accepted domain (byte tag, wallet, widths)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Numeric value does not fit its fixed-width slot
    #[error("{field} out of range: {value} (max {max})")]
    OutOfRange {
        /// Field name
        field: &'static str,
        /// Supplied value
        value: u64,
        /// Largest accepted value
        max: u64,
    },

    /// Free field or inbound payload value is structurally invalid
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Required context (beneficiary, account, print type) was not supplied
    #[error("Missing context: {0}")]
    MissingContext(&'static str),

    /// Derived field was already frozen
    #[error("Derived field already frozen: {0}")]
    AlreadyFrozen(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metrics registration error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Payload-free error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::InvalidArgument`]
    InvalidArgument,
    /// See [`Error::OutOfRange`]
    OutOfRange,
    /// See [`Error::MalformedInput`]
    MalformedInput,
    /// See [`Error::MissingContext`]
    MissingContext,
    /// See [`Error::AlreadyFrozen`]
    AlreadyFrozen,
    /// Configuration, IO and metrics failures
    Environment,
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::OutOfRange { .. } => ErrorKind::OutOfRange,
            Error::MalformedInput(_) => ErrorKind::MalformedInput,
            Error::MissingContext(_) => ErrorKind::MissingContext,
            Error::AlreadyFrozen(_) => ErrorKind::AlreadyFrozen,
            Error::Config(_) | Error::Io(_) | Error::Metrics(_) => ErrorKind::Environment,
        }
    }
}
