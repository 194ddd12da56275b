use thiserror::Error;

use jes::ParseError;

#[derive(Error, Debug)]
pub enum JesError {
    #[error("stylesheet error: {0}")]
    Parse(#[from] ParseError),

    #[error("unknown variable: ${0}")]
    UnknownVariable(String),

    #[error("I/O error reading stylesheet")]
    Io(#[from] std::io::Error),

    #[error("a logger is already installed")]
    Logger(#[from] log::SetLoggerError),
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, JesError>;
