//! synthflow
//!
//! Librería central del servicio de síntesis:
//! - `config`: configuración desde entorno / .env.
//! - `errors`: errores de aplicación.
//! - `service`: ensamblado de store, sintetizador y executor.
//!
//! Puede usarse desde `synth-cli` o por otros clientes.

pub mod config;
pub mod errors;
pub mod service;

pub use config::AppConfig;
pub use errors::AppError;
pub use service::{version, SynthOrchestrator, SynthService, VersionInfo};
pub use synth_core::{CancelResponse, FingerprintId, StatusSummary, SubmitResponse, TaskStatus, Ticket};
pub use synth_domain::SynthesisRequest;
