//! Errores de persistencia.
//! Mapea errores de IO y de configuración a variantes semánticas.

use std::io;

use synth_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("cache root '{0}' is not a directory")]
    NotADirectory(String),
    #[error("invalid configuration {key}='{value}': {reason}")]
    InvalidConfig { key: String, value: String, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(id) => StoreError::NotFound(id),
            PersistenceError::Io(e) => StoreError::Io(e),
            other => StoreError::Backend(other.to_string()),
        }
    }
}
