use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("site {0} is unreachable")]
    Unreachable(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
