//! synth-persistence
//!
//! Store de resultados persistente sobre disco para el núcleo de síntesis.
//!
//! Módulos:
//! - `fs`: `FsResultStore` con publicación atómica (temporal + rename).
//! - `config`: carga de configuración desde .env / entorno.
//! - `error`: errores de persistencia y su mapeo a `StoreError`.

pub mod config;
pub mod error;
pub mod fs;

pub use config::{init_dotenv, StoreConfig};
pub use error::PersistenceError;
pub use fs::FsResultStore;
