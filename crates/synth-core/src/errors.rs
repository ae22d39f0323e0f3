//! Errores del núcleo de orquestación.

use thiserror::Error;

/// Errores que `Orchestrator` devuelve de forma síncrona al llamador.
///
/// Los fallos de la síntesis no aparecen aquí: se registran en el ledger y
/// se observan con `query`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),
    #[error("request could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("internal: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Errores de un `ResultStore`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no cached result for {0}")]
    NotFound(String),
    #[error("result store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("result store backend: {0}")]
    Backend(String),
}

/// Fallo descriptivo del pipeline de síntesis.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PipelineError(pub String);

impl PipelineError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}
