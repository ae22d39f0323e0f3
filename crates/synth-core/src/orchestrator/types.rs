//! Respuestas del orquestador, con la forma que serializa la capa de
//! transporte.
use serde::{Deserialize, Serialize};

use crate::model::{FingerprintId, Ticket};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitResponse {
    /// El resultado ya está en cache; no se creó ni unió ninguna tarea.
    HitCache { token: FingerprintId },
    /// Se creó o unió una tarea; `code` es el ticket del llamador.
    Submitted {
        token: FingerprintId,
        #[serde(rename = "code")]
        ticket: Ticket,
    },
}

impl SubmitResponse {
    pub fn token(&self) -> &FingerprintId {
        match self {
            Self::HitCache { token } | Self::Submitted { token, .. } => token,
        }
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        match self {
            Self::HitCache { .. } => None,
            Self::Submitted { ticket, .. } => Some(ticket),
        }
    }
}

/// Estado observable de un fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    HitCache,
    Queued,
    Running,
    Finished,
    Failed { message: String },
    Cancelled,
}

impl TaskStatus {
    /// `true` mientras tenga sentido seguir consultando.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Queued | Self::Running)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelResponse {
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CancelResponse {
    pub fn ok() -> Self {
        Self { succeeded: true,
               message: None }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self { succeeded: false,
               message: Some(message.into()) }
    }
}
