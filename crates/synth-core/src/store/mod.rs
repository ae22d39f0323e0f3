//! Almacenamiento direccionado por contenido de resultados terminados.
//!
//! La existencia de una entrada es la prueba autoritativa de que la tarea
//! terminó: el orquestador consulta el store antes que el registro. Una
//! entrada, una vez publicada, es final (no hay actualización in-place).

pub mod memory;

pub use memory::InMemoryResultStore;

use crate::errors::StoreError;
use crate::model::FingerprintId;

/// Contrato de un store de resultados.
///
/// `write` debe ser atómico respecto de `exists`/`read`: nunca se observa una
/// entrada parcialmente escrita.
pub trait ResultStore: Send + Sync + 'static {
    fn exists(&self, id: &FingerprintId) -> bool;

    fn write(&self, id: &FingerprintId, bytes: &[u8]) -> Result<(), StoreError>;

    fn read(&self, id: &FingerprintId) -> Result<Vec<u8>, StoreError>;
}
