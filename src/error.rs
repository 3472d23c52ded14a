use thiserror::Error;

/// Error taxonomy for the payment tracker.
///
/// `InsufficientFunds` is deliberately absent: running out of balance is a
/// normal business outcome that produces a `Pending` payment, not an error.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not logged in; run `venpay login <username>` first")]
    SessionRequired,
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
