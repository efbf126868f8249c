use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML serialization failed: {0}")]
    Xml(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
