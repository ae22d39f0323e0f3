//! Orquestador: `submit`, `query`, `cancel` y `fetch` sobre el store de
//! resultados, el ledger de fallos y el registro de tareas.
//!
//! Todas las lecturas y escrituras del registro ocurren dentro de una única
//! sección crítica (`Mutex<TaskRegistry>`) que nunca se mantiene durante la
//! síntesis ni durante la escritura o lectura de resultados. Dos `submit`
//! concurrentes del mismo fingerprint se serializan en ella: uno crea la
//! tarea y el resto se une como suscriptor.

pub mod types;

pub use types::{CancelResponse, SubmitResponse, TaskStatus};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::constants::{MSG_ALREADY_CACHED, MSG_UNKNOWN_TASK};
use crate::errors::{CoreError, PipelineError, StoreError};
use crate::executor::{ExecutionHandle, ExecutionState, Executor, JobOutcome};
use crate::ledger::LedgerRecord;
use crate::model::{fingerprint_of, FingerprintId, Ticket};
use crate::pipeline::Pipeline;
use crate::registry::{StatusSummary, TaskId, TaskRegistry, Withdrawal};
use crate::store::ResultStore;

struct Inner<S, P> {
    store: Arc<S>,
    pipeline: Arc<P>,
    executor: Executor,
    registry: Mutex<TaskRegistry>,
}

impl<S, P> Inner<S, P> {
    fn registry(&self) -> MutexGuard<'_, TaskRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct Orchestrator<S, P>
    where S: ResultStore,
          P: Pipeline
{
    inner: Arc<Inner<S, P>>,
}

impl<S, P> Clone for Orchestrator<S, P>
    where S: ResultStore,
          P: Pipeline
{
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S, P> std::fmt::Debug for Orchestrator<S, P>
    where S: ResultStore,
          P: Pipeline
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
         .field("workers", &self.inner.executor.workers())
         .field("summary", &self.summary())
         .finish()
    }
}

impl<S, P> Orchestrator<S, P>
    where S: ResultStore,
          P: Pipeline
{
    pub fn new(store: Arc<S>, pipeline: Arc<P>, executor: Executor) -> Self {
        Self { inner: Arc::new(Inner { store,
                                       pipeline,
                                       executor,
                                       registry: Mutex::new(TaskRegistry::new()) }) }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.inner.store
    }

    pub fn pipeline(&self) -> &Arc<P> {
        &self.inner.pipeline
    }

    pub fn executor(&self) -> &Executor {
        &self.inner.executor
    }

    /// Acepta un request. Cache hit no toca el registro; si no, se une a la
    /// tarea viva del fingerprint o crea una nueva (limpiando el ledger).
    pub fn submit(&self, request: P::Request) -> Result<SubmitResponse, CoreError> {
        let request = self.inner.pipeline.prepare(request)?;
        let token = fingerprint_of(&request)?;
        if self.inner.store.exists(&token) {
            return Ok(SubmitResponse::HitCache { token });
        }

        let mut registry = self.inner.registry();
        if let Some(ticket) = registry.join(&token) {
            log::debug!("joined task '{token}' with ticket {ticket}");
            return Ok(SubmitResponse::Submitted { token, ticket });
        }
        // La tarea pudo terminar entre la consulta al store y el lock.
        if self.inner.store.exists(&token) {
            return Ok(SubmitResponse::HitCache { token });
        }
        let task_id = registry.allocate_task_id();
        let handle = self.spawn(&token, task_id, request);
        let ticket = registry.insert(&token, task_id, handle);
        log::debug!("created task {task_id} for '{token}' with ticket {ticket}");
        Ok(SubmitResponse::Submitted { token, ticket })
    }

    /// Estado de un fingerprint: store, luego registro, luego ledger.
    /// `None` si nunca se envió o su rastro ya se limpió.
    pub fn query(&self, token: &FingerprintId) -> Option<TaskStatus> {
        if self.inner.store.exists(token) {
            return Some(TaskStatus::HitCache);
        }
        {
            let registry = self.inner.registry();
            if let Some(entry) = registry.get(token) {
                return Some(status_of(&entry.handle));
            }
            match registry.ledger().get(token) {
                Some(LedgerRecord::Failed { message, .. }) => {
                    return Some(TaskStatus::Failed { message: message.clone() })
                }
                Some(LedgerRecord::Cancelled { .. }) => return Some(TaskStatus::Cancelled),
                None => {}
            }
        }
        // La tarea pudo publicar su resultado y salir del registro entre la
        // primera consulta al store y el lock.
        self.inner.store.exists(token).then_some(TaskStatus::HitCache)
    }

    /// Retira el ticket del llamador. Cuando sale el último, la tarea deja el
    /// registro y se intenta abortar; si ya estaba corriendo, termina igual y
    /// su resultado se publica sin suscriptores.
    pub fn cancel(&self, token: &FingerprintId, ticket: &Ticket) -> CancelResponse {
        if self.inner.store.exists(token) {
            return CancelResponse::rejected(MSG_ALREADY_CACHED);
        }
        let mut registry = self.inner.registry();
        match registry.withdraw(token, ticket) {
            Withdrawal::Unknown => CancelResponse::rejected(MSG_UNKNOWN_TASK),
            Withdrawal::Remaining(left) => {
                log::debug!("ticket {ticket} left task '{token}', {left} subscriber(s) remain");
                CancelResponse::ok()
            }
            Withdrawal::LastOut(entry) => {
                if entry.handle.cancel() {
                    registry.ledger_mut().record_cancelled(token);
                    log::info!("task '{token}' cancelled before it started");
                } else {
                    log::warn!("task '{token}' already started; it will run to completion without subscribers");
                }
                CancelResponse::ok()
            }
        }
    }

    /// Bytes del resultado en cache, si existe.
    pub fn fetch(&self, token: &FingerprintId) -> Result<Option<Vec<u8>>, CoreError> {
        match self.inner.store.read(token) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn summary(&self) -> StatusSummary {
        self.inner.registry().summary()
    }

    /// Consulta periódicamente hasta un estado no pendiente.
    pub async fn wait_for(&self, token: &FingerprintId, poll: Duration) -> Option<TaskStatus> {
        loop {
            match self.query(token) {
                Some(status) if status.is_pending() => tokio::time::sleep(poll).await,
                other => return other,
            }
        }
    }

    fn spawn(&self, token: &FingerprintId, task_id: TaskId, request: P::Request) -> ExecutionHandle {
        let pipeline = Arc::clone(&self.inner.pipeline);
        let inner = Arc::clone(&self.inner);
        let completed = token.clone();
        self.inner.executor.submit(token,
                                   move || pipeline.run(&request),
                                   move |outcome| complete(&inner, &completed, task_id, outcome))
    }
}

/// Callback de finalización: publica el resultado (fuera del lock) y luego,
/// dentro de la sección crítica, retira la entrada y anota el fallo si lo hubo.
fn complete<S, P>(inner: &Inner<S, P>, token: &FingerprintId, task_id: TaskId, outcome: JobOutcome) -> Result<(), PipelineError>
    where S: ResultStore
{
    let stored = outcome.and_then(|bytes| {
                            inner.store
                                 .write(token, &bytes)
                                 .map_err(|e| PipelineError::new(format!("failed to store result: {e}")))
                        });

    let mut registry = inner.registry();
    let was_current = registry.remove_if_current(token, task_id);
    if let Err(e) = &stored {
        // Un fallo tardío no debe ensuciar el ledger de una tarea más nueva.
        if was_current || !registry.contains(token) {
            registry.ledger_mut().record_failure(token, e.message());
        }
    }
    if !was_current {
        log::debug!("task {task_id} for '{token}' completed after its registry entry was withdrawn");
    }
    stored
}

fn status_of(handle: &ExecutionHandle) -> TaskStatus {
    match handle.status() {
        ExecutionState::Queued => TaskStatus::Queued,
        ExecutionState::Running => TaskStatus::Running,
        ExecutionState::Finished => TaskStatus::Finished,
        ExecutionState::Failed(message) => TaskStatus::Failed { message },
        ExecutionState::Cancelled => TaskStatus::Cancelled,
    }
}
