use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input text is empty")]
    EmptyInput,

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
