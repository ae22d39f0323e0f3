//! synth-adapters: puente entre el dominio de síntesis y el núcleo.
//!
//! - `preprocess`: request → entrada alineada a frames.
//! - `tone`: `ToneSynthesizer`, implementación de `Pipeline` de referencia.
//! - `wav`: codificación PCM 16 bits.
//! - `models`: catálogo de modelos en disco.
pub mod models;
pub mod preprocess;
pub mod tone;
pub mod wav;

pub use models::list_models;
pub use preprocess::{preprocess, AcousticInput, FrameGeometry, PreprocessError};
pub use tone::{ToneConfig, ToneSynthesizer, DEFAULT_MAX_DURATION_SECS};
pub use wav::WavError;
