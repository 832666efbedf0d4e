//! Configuration parsing errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("KDL parse error: {0}")]
    Parse(#[from] kdl::KdlError),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("duplicate definition: {0}")]
    Duplicate(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error(transparent)]
    Resolve(#[from] cosmos_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<cosmos_core::StructuralError> for ConfigError {
    fn from(err: cosmos_core::StructuralError) -> Self {
        ConfigError::Resolve(err.into())
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
