//! Pool acotado de workers sobre un runtime tokio.
//!
//! Cada ejecución espera un permiso del semáforo (capacidad = `workers`) y
//! corre en `spawn_blocking`; el permiso se libera cuando termina la llamada
//! bloqueante. El callback de finalización también corre del lado bloqueante
//! porque puede hacer I/O, y sólo después de que el job haya retornado.
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::Semaphore;

use super::handle::ExecutionHandle;
use crate::constants::DEFAULT_WORKERS;
use crate::errors::{CoreError, PipelineError};
use crate::model::FingerprintId;

/// Resultado de una ejecución del pipeline.
pub type JobOutcome = Result<Vec<u8>, PipelineError>;

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Número máximo de ejecuciones concurrentes.
    pub workers: usize,
    /// Tiempo máximo de una ejecución; al expirar cuenta como fallo.
    ///
    /// Una llamada bloqueante no se puede interrumpir: al expirar, el
    /// executor espera a que retorne, descarta su resultado y recién entonces
    /// informa `synthesis timed out after ...`. Mientras tanto la ejecución
    /// sigue `Running` y conserva su permiso.
    pub deadline: Option<Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { workers: DEFAULT_WORKERS,
               deadline: None }
    }
}

impl ExecutorConfig {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers,
               ..Self::default() }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Executor {
    runtime: Handle,
    permits: Arc<Semaphore>,
    config: ExecutorConfig,
}

impl Executor {
    pub fn new(config: ExecutorConfig, runtime: Handle) -> Self {
        let workers = config.workers.max(1);
        Self { runtime,
               permits: Arc::new(Semaphore::new(workers)),
               config: ExecutorConfig { workers, ..config } }
    }

    /// Construye el executor sobre el runtime tokio actual.
    pub fn current(config: ExecutorConfig) -> Result<Self, CoreError> {
        let runtime = Handle::try_current().map_err(|e| CoreError::Internal(format!("no tokio runtime: {e}")))?;
        Ok(Self::new(config, runtime))
    }

    pub fn workers(&self) -> usize {
        self.config.workers
    }

    /// Permisos libres en este instante (workers ociosos).
    pub fn idle_workers(&self) -> usize {
        self.permits.available_permits()
    }

    /// Encola `job`. `on_complete` se invoca exactamente una vez si la
    /// ejecución llega a empezar, con el resultado del job; lo que devuelve
    /// es el desenlace definitivo que refleja el handle. Si la ejecución se
    /// cancela en cola, ni `job` ni `on_complete` se invocan.
    pub fn submit<J, C>(&self, id: &FingerprintId, job: J, on_complete: C) -> ExecutionHandle
        where J: FnOnce() -> JobOutcome + Send + 'static,
              C: FnOnce(JobOutcome) -> Result<(), PipelineError> + Send + 'static
    {
        let handle = ExecutionHandle::new();
        let task_handle = handle.clone();
        let permits = Arc::clone(&self.permits);
        let deadline = self.config.deadline;
        let id = id.clone();

        self.runtime.spawn(async move {
            let permit = match permits.acquire_owned().await {
                Ok(p) => p,
                Err(_) => {
                    log::error!("executor closed, dropping task '{id}'");
                    return;
                }
            };
            if !task_handle.try_start() {
                log::debug!("task '{id}' was cancelled before it started");
                return;
            }
            log::info!("task '{id}' begins");

            let mut work = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                job()
            });
            let outcome = match deadline {
                Some(limit) => match tokio::time::timeout(limit, &mut work).await {
                    Ok(joined) => joined_outcome(joined),
                    Err(_) => {
                        log::warn!("task '{id}' exceeded its deadline of {limit:?}; waiting for it to return");
                        let _ = work.await;
                        Err(PipelineError::new(format!("synthesis timed out after {limit:?}")))
                    }
                },
                None => joined_outcome(work.await),
            };

            let finished = tokio::task::spawn_blocking(move || on_complete(outcome)).await;
            let result = match finished {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.0),
                Err(e) => Err(format!("completion callback failed: {}", join_message(e))),
            };
            match &result {
                Ok(()) => log::info!("task '{id}' finished"),
                Err(message) => log::error!("task '{id}' failed: {message}"),
            }
            task_handle.finish(result);
        });

        handle
    }
}

fn joined_outcome(joined: Result<JobOutcome, tokio::task::JoinError>) -> JobOutcome {
    joined.unwrap_or_else(|e| Err(PipelineError::new(format!("synthesis panicked: {}", join_message(e)))))
}

fn join_message(err: tokio::task::JoinError) -> String {
    if err.is_panic() {
        panic_message(err.into_panic())
    } else {
        err.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
