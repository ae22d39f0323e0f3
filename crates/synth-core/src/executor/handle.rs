use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Estado de una ejecución.
///
/// Las transiciones válidas son:
/// - `Queued` -> `Running`
/// - `Queued` -> `Cancelled`
/// - `Running` -> `Finished`
/// - `Running` -> `Failed`
///
/// No se permiten reversiones: una vez terminal, el estado no cambia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionState {
    /// Aceptada, esperando un worker libre.
    Queued,
    /// Un worker la está ejecutando.
    Running,
    /// Terminó y su resultado quedó publicado.
    Finished,
    /// Terminó con error.
    Failed(String),
    /// Abortada antes de empezar.
    Cancelled,
}

impl ExecutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed(_) | Self::Cancelled)
    }
}

/// Handle compartido de una ejecución. La cancelación es best-effort: sólo
/// tiene efecto mientras la ejecución sigue en cola.
#[derive(Debug, Clone)]
pub struct ExecutionHandle {
    state: Arc<Mutex<ExecutionState>>,
}

impl ExecutionHandle {
    pub(crate) fn new() -> Self {
        Self { state: Arc::new(Mutex::new(ExecutionState::Queued)) }
    }

    fn lock(&self) -> MutexGuard<'_, ExecutionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> ExecutionState {
        self.lock().clone()
    }

    pub fn is_terminal(&self) -> bool {
        self.lock().is_terminal()
    }

    /// Intenta abortar. Devuelve `true` sólo si la ejecución no había empezado.
    pub fn cancel(&self) -> bool {
        let mut state = self.lock();
        if *state == ExecutionState::Queued {
            *state = ExecutionState::Cancelled;
            true
        } else {
            false
        }
    }

    /// `Queued` -> `Running`. Falla si fue cancelada mientras esperaba.
    pub(crate) fn try_start(&self) -> bool {
        let mut state = self.lock();
        if *state == ExecutionState::Queued {
            *state = ExecutionState::Running;
            true
        } else {
            false
        }
    }

    pub(crate) fn finish(&self, outcome: Result<(), String>) {
        let mut state = self.lock();
        if *state != ExecutionState::Running {
            log::warn!("ignoring completion of an execution in state {:?}", *state);
            return;
        }
        *state = match outcome {
            Ok(()) => ExecutionState::Finished,
            Err(message) => ExecutionState::Failed(message),
        };
    }
}
