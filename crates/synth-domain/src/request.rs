//! Request de síntesis.
//!
//! Ejemplo de cuerpo aceptado:
//!
//! ```json
//! {
//!   "model": "1215_opencpop_ds1000_fix_label_nomidi",
//!   "phonemes": [{"name": "SP", "duration": 0.5}, {"name": "a", "duration": 0.5}],
//!   "f0": {"timestep": 0.01, "values": [440.0, 440.0, 440.0]},
//!   "speedup": 50
//! }
//! ```
//!
//! `speedup` es opcional: `with_defaults` lo rellena con el valor de
//! configuración antes del fingerprint, de modo que omitirlo y enviarlo con el
//! valor por defecto producen el mismo token.
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phoneme {
    pub name: String,
    /// Duración en segundos.
    pub duration: f64,
}

/// Curva de f0 muestreada a paso fijo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct F0Curve {
    /// Segundos entre muestras.
    pub timestep: f64,
    /// Frecuencias en Hz.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub model: String,
    pub phonemes: Vec<Phoneme>,
    pub f0: F0Curve,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speedup: Option<u32>,
}

impl SynthesisRequest {
    pub fn from_json(body: &str) -> Result<Self, DomainError> {
        serde_json::from_str(body).map_err(|e| DomainError::Validation(e.to_string()))
    }

    /// Rellena los campos omitidos con los valores de configuración.
    pub fn with_defaults(mut self, default_speedup: u32) -> Self {
        if self.speedup.is_none() {
            self.speedup = Some(default_speedup);
        }
        self
    }

    pub fn speedup_or(&self, default_speedup: u32) -> u32 {
        self.speedup.unwrap_or(default_speedup)
    }

    /// Duración total declarada por los fonemas (segundos).
    pub fn total_duration(&self) -> f64 {
        self.phonemes.iter().map(|p| p.duration).sum()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |msg: String| Err(DomainError::Validation(msg));

        if self.model.trim().is_empty() {
            return invalid("model must not be empty".into());
        }
        if self.model.contains(['/', '\\']) || self.model.contains("..") {
            return invalid(format!("model name '{}' is not a plain name", self.model));
        }
        if self.phonemes.is_empty() {
            return invalid("at least one phoneme is required".into());
        }
        for (i, ph) in self.phonemes.iter().enumerate() {
            if ph.name.trim().is_empty() {
                return invalid(format!("phoneme {i} has an empty name"));
            }
            if !ph.duration.is_finite() || ph.duration < 0.0 {
                return invalid(format!("phoneme {i} ('{}') has invalid duration {}", ph.name, ph.duration));
            }
        }
        if !self.total_duration().is_finite() {
            return invalid("total duration is not finite".into());
        }
        if !self.f0.timestep.is_finite() || self.f0.timestep <= 0.0 {
            return invalid(format!("f0 timestep must be positive, got {}", self.f0.timestep));
        }
        if self.f0.values.is_empty() {
            return invalid("f0 must contain at least one value".into());
        }
        if let Some(bad) = self.f0.values.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return invalid(format!("f0 value {bad} is not a valid frequency"));
        }
        if self.speedup == Some(0) {
            return invalid("speedup must be at least 1".into());
        }
        Ok(())
    }
}
