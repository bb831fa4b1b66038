use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Essential sheet headers are missing: {0}")]
    MissingHeaders(String),
}
