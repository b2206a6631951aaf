use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("tensor error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("unsupported embedding dimensionality {0} (expected 25 or 300)")]
    UnsupportedDimension(usize),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("embedding table line {line}: {message}")]
    Table { line: usize, message: String },

    #[error("artifact error: {0}")]
    Artifact(String),
}
