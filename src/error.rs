use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpDefsError {
    #[error("Invalid date format: {0}")]
    DateFormat(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HttpDefsError>;
