//! Contrato del pipeline de síntesis (colaborador externo del núcleo).
use serde::Serialize;

use crate::errors::{CoreError, PipelineError};

/// Computación costosa y determinista: del request estructurado a un blob.
///
/// Implementaciones deben ser puras respecto del request: el núcleo sólo
/// interpreta el éxito o el fallo.
pub trait Pipeline: Send + Sync + 'static {
    type Request: Serialize + Send + Sync + 'static;

    /// Normaliza y valida el request antes del fingerprint: rellena valores
    /// por defecto para que un campo omitido y su default colisionen. Un error
    /// aquí se devuelve al llamador y nunca llega al registro.
    fn prepare(&self, request: Self::Request) -> Result<Self::Request, CoreError> {
        Ok(request)
    }

    fn run(&self, request: &Self::Request) -> Result<Vec<u8>, PipelineError>;
}
