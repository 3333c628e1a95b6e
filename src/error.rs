use thiserror::Error;

#[derive(Error, Debug)]
pub enum SsptError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Domain Error: {0}")]
    Domain(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

pub type SsptResult<T> = Result<T, SsptError>;
