//! Error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Division by a complex value of zero magnitude")]
    DivisionByZero,

    #[error("Invalid view parameters: {0}")]
    InvalidParameters(String),

    #[error(transparent)]
    Arguments(#[from] clap::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
