use thiserror::Error;

/// Errors raised by the core time and coordinate types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Malformed construction or conversion arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
