//! Executor: pool acotado que corre a lo sumo una ejecución por fingerprint
//! (la unicidad la garantiza el registro) y reporta el desenlace vía callback.

pub mod handle;
pub mod pool;

pub use handle::{ExecutionHandle, ExecutionState};
pub use pool::{Executor, ExecutorConfig, JobOutcome};
