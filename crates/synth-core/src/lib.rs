//! synth-core: orquestación de tareas de síntesis con cache direccionada por
//! contenido.
//!
//! Piezas, de las hojas hacia arriba:
//! - `hashing` / `model`: fingerprint canónico de requests y tickets.
//! - `store`: contrato del store de resultados (+ implementación en memoria).
//! - `ledger`: último fallo (o cancelación) por fingerprint.
//! - `registry`: tareas en vuelo y sus suscriptores.
//! - `executor`: pool acotado de workers con cancelación best-effort.
//! - `orchestrator`: `submit` / `query` / `cancel` / `fetch`.
pub mod constants;
pub mod errors;
pub mod executor;
pub mod hashing;
pub mod ledger;
pub mod model;
pub mod orchestrator;
pub mod pipeline;
pub mod registry;
pub mod store;

pub use errors::{CoreError, PipelineError, StoreError};
pub use executor::{ExecutionHandle, ExecutionState, Executor, ExecutorConfig};
pub use ledger::{FailureLedger, LedgerRecord};
pub use model::{fingerprint_of, FingerprintId, Ticket};
pub use orchestrator::{CancelResponse, Orchestrator, SubmitResponse, TaskStatus};
pub use pipeline::Pipeline;
pub use registry::{StatusSummary, TaskRegistry};
pub use store::{InMemoryResultStore, ResultStore};
