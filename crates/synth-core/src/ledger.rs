//! Ledger de fallos: último desenlace no exitoso por fingerprint.
//!
//! Es estado transitorio: vive dentro de la sección crítica del registro y se
//! invalida cuando se acepta un nuevo submit que crea tarea para el mismo
//! fingerprint. Información de fallo obsoleta nunca debe verse tras un
//! reintento aceptado.
//!
//! Sin reintento un registro no se invalida nunca, así que el ledger está
//! acotado: al superar su capacidad se descarta el registro más antiguo y ese
//! fingerprint vuelve a consultarse como desconocido.
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::constants::DEFAULT_LEDGER_CAPACITY;
use crate::model::FingerprintId;

/// Registro del ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerRecord {
    /// La tarea terminó con error.
    Failed { message: String, at: DateTime<Utc> },
    /// La tarea fue abortada antes de empezar (todos los suscriptores se
    /// retiraron mientras estaba en cola).
    Cancelled { at: DateTime<Utc> },
}

/// Registros en orden de inserción (el primero es el más antiguo).
#[derive(Debug)]
pub struct FailureLedger {
    records: IndexMap<FingerprintId, LedgerRecord>,
    capacity: usize,
}

impl Default for FailureLedger {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LEDGER_CAPACITY)
    }
}

impl FailureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger que conserva a lo sumo `capacity` registros (mínimo 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self { records: IndexMap::new(),
               capacity: capacity.max(1) }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record_failure(&mut self, id: &FingerprintId, message: impl Into<String>) {
        self.record(id,
                    LedgerRecord::Failed { message: message.into(),
                                           at: Utc::now() });
    }

    pub fn record_cancelled(&mut self, id: &FingerprintId) {
        self.record(id, LedgerRecord::Cancelled { at: Utc::now() });
    }

    fn record(&mut self, id: &FingerprintId, record: LedgerRecord) {
        // un registro nuevo pasa al final aunque el fingerprint ya estuviera
        self.records.shift_remove(id);
        while self.records.len() >= self.capacity {
            if let Some((evicted, _)) = self.records.shift_remove_index(0) {
                log::debug!("ledger full, dropping record for '{evicted}'");
            }
        }
        self.records.insert(id.clone(), record);
    }

    pub fn get(&self, id: &FingerprintId) -> Option<&LedgerRecord> {
        self.records.get(id)
    }

    /// Elimina el registro (si lo hay). Devuelve si existía.
    pub fn clear(&mut self, id: &FingerprintId) -> bool {
        self.records.shift_remove(id).is_some()
    }

    pub fn failures(&self) -> usize {
        self.records
            .values()
            .filter(|r| matches!(r, LedgerRecord::Failed { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fingerprint_of;

    #[test]
    fn latest_record_replaces_previous() {
        let mut ledger = FailureLedger::new();
        let id = fingerprint_of(&1).unwrap();
        ledger.record_failure(&id, "first");
        ledger.record_failure(&id, "second");
        assert!(matches!(ledger.get(&id), Some(LedgerRecord::Failed { message, .. }) if message == "second"));
        ledger.record_cancelled(&id);
        assert!(matches!(ledger.get(&id), Some(LedgerRecord::Cancelled { .. })));
        assert_eq!(ledger.failures(), 0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut ledger = FailureLedger::new();
        let id = fingerprint_of(&2).unwrap();
        ledger.record_failure(&id, "boom");
        assert!(ledger.clear(&id));
        assert!(!ledger.clear(&id));
        assert!(ledger.is_empty());
    }

    #[test]
    fn oldest_record_is_evicted_at_capacity() {
        let mut ledger = FailureLedger::with_capacity(2);
        let ids: Vec<_> = (0..3).map(|n| fingerprint_of(&n).unwrap()).collect();
        ledger.record_failure(&ids[0], "a");
        ledger.record_cancelled(&ids[1]);
        // volver a registrar ids[0] lo convierte en el más reciente
        ledger.record_failure(&ids[0], "a again");
        ledger.record_failure(&ids[2], "c");
        assert_eq!(ledger.len(), 2);
        assert!(ledger.get(&ids[1]).is_none());
        assert!(ledger.get(&ids[0]).is_some());
        assert!(ledger.get(&ids[2]).is_some());
    }

    #[test]
    fn default_capacity_is_bounded() {
        assert_eq!(FailureLedger::new().capacity(), DEFAULT_LEDGER_CAPACITY);
        assert_eq!(FailureLedger::with_capacity(0).capacity(), 1);
    }
}
