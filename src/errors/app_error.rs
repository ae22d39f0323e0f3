use synth_core::CoreError;
use synth_domain::DomainError;
use synth_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de configuración: {key}='{value}': {reason}")]
    Config { key: String, value: String, reason: String },
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn config(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::Config { key: key.to_string(),
                       value: value.to_string(),
                       reason: reason.into() }
    }
}
