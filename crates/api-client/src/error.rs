use normalizer::NormalizeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The API request returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Invalid data format from source: {0}")]
    InvalidData(String),

    #[error("Failed to read trade file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}
