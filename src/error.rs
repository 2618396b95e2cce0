use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Normalization string {0:?} is invalid")]
    InvalidNormalization(String),
    #[error("Tuning parameters are invalid: {0}")]
    InvalidParameters(#[from] ValidationErrors),
    #[error("Failed to parse options: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum SerializationError {
    #[error("Payload is truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("Extra data in payload: {0} trailing bytes")]
    TrailingBytes(usize),
    #[error("Unknown {field} variant {value}")]
    UnknownVariant { field: &'static str, value: u8 },
}

#[derive(Debug, Error)]
pub enum WeightError {
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

impl From<ValidationErrors> for WeightError {
    fn from(e: ValidationErrors) -> Self {
        Self::InvalidConfiguration(e.into())
    }
}
