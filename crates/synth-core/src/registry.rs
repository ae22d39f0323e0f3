//! Registro de tareas en vuelo.
//!
//! Mapea fingerprint -> tarea (handle de ejecución + conjunto de tickets) y
//! contiene el ledger de fallos. Toda la estructura vive detrás de un único
//! `Mutex` del orquestador; nada fuera de él la lee ni la modifica.
//!
//! Invariantes:
//! - A lo sumo una tarea viva por fingerprint.
//! - El conjunto de tickets de una tarea viva nunca está vacío.
//! - Cada tarea tiene un `task_id` único en el proceso. La finalización sólo
//!   elimina la entrada si sigue perteneciendo a esa tarea, de modo que una
//!   ejecución cancelada que termina tarde no borra una tarea más nueva.
use std::collections::HashMap;

use indexmap::IndexSet;
use serde::Serialize;

use crate::executor::{ExecutionHandle, ExecutionState};
use crate::ledger::FailureLedger;
use crate::model::{FingerprintId, Ticket};

pub type TaskId = u64;

#[derive(Debug)]
pub struct TaskEntry {
    pub task_id: TaskId,
    pub handle: ExecutionHandle,
    tickets: IndexSet<Ticket>,
}

impl TaskEntry {
    pub fn tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.iter()
    }

    pub fn subscribers(&self) -> usize {
        self.tickets.len()
    }

    fn mint_ticket(&mut self) -> Ticket {
        loop {
            let ticket = Ticket::mint();
            if self.tickets.insert(ticket.clone()) {
                return ticket;
            }
        }
    }
}

/// Resultado de retirar un ticket.
#[derive(Debug)]
pub enum Withdrawal {
    /// No hay tarea viva para el fingerprint o el ticket no es suscriptor.
    Unknown,
    /// Ticket retirado; la tarea conserva `remaining` suscriptores.
    Remaining(usize),
    /// Era el último ticket: la entrada se eliminó del registro y se devuelve.
    LastOut(TaskEntry),
}

/// Resumen del estado del registro.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub queued: usize,
    pub running: usize,
    pub subscribers: usize,
    pub failures: usize,
    pub ledger_records: usize,
}

#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: HashMap<FingerprintId, TaskEntry>,
    ledger: FailureLedger,
    next_task_id: TaskId,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &FingerprintId) -> Option<&TaskEntry> {
        self.tasks.get(id)
    }

    pub fn contains(&self, id: &FingerprintId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn ledger(&self) -> &FailureLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut FailureLedger {
        &mut self.ledger
    }

    /// Une un nuevo suscriptor a la tarea viva, si existe.
    pub fn join(&mut self, id: &FingerprintId) -> Option<Ticket> {
        self.tasks.get_mut(id).map(TaskEntry::mint_ticket)
    }

    /// Reserva el identificador de la próxima tarea.
    pub fn allocate_task_id(&mut self) -> TaskId {
        self.next_task_id += 1;
        self.next_task_id
    }

    /// Registra una tarea nueva con un único ticket (el de su creador) e
    /// invalida cualquier registro previo del ledger para el fingerprint.
    ///
    /// El llamador garantiza que no hay tarea viva para `id`.
    pub fn insert(&mut self, id: &FingerprintId, task_id: TaskId, handle: ExecutionHandle) -> Ticket {
        if self.ledger.clear(id) {
            log::debug!("cleared stale ledger record for '{id}'");
        }
        let mut entry = TaskEntry { task_id,
                                    handle,
                                    tickets: IndexSet::new() };
        let ticket = entry.mint_ticket();
        if let Some(prev) = self.tasks.insert(id.clone(), entry) {
            log::error!("replaced live task {} for '{id}'", prev.task_id);
        }
        ticket
    }

    /// Retira un ticket. Si era el último, la entrada sale del registro.
    pub fn withdraw(&mut self, id: &FingerprintId, ticket: &Ticket) -> Withdrawal {
        let Some(entry) = self.tasks.get_mut(id) else {
            return Withdrawal::Unknown;
        };
        if !entry.tickets.shift_remove(ticket) {
            return Withdrawal::Unknown;
        }
        if entry.tickets.is_empty() {
            match self.tasks.remove(id) {
                Some(entry) => Withdrawal::LastOut(entry),
                None => Withdrawal::Unknown,
            }
        } else {
            Withdrawal::Remaining(entry.tickets.len())
        }
    }

    /// Elimina la entrada de `id` sólo si pertenece a `task_id`. Devuelve si
    /// la eliminó; una entrada ausente o ajena es un no-op.
    pub fn remove_if_current(&mut self, id: &FingerprintId, task_id: TaskId) -> bool {
        match self.tasks.get(id) {
            Some(entry) if entry.task_id == task_id => {
                self.tasks.remove(id);
                true
            }
            _ => false,
        }
    }

    pub fn summary(&self) -> StatusSummary {
        let mut summary = StatusSummary { failures: self.ledger.failures(),
                                          ledger_records: self.ledger.len(),
                                          ..StatusSummary::default() };
        for entry in self.tasks.values() {
            summary.subscribers += entry.subscribers();
            match entry.handle.status() {
                ExecutionState::Queued => summary.queued += 1,
                ExecutionState::Running => summary.running += 1,
                _ => {}
            }
        }
        summary
    }
}
