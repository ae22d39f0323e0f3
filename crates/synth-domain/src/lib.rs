//! synth-domain: modelo del request de síntesis y vocabulario de fonemas.
pub mod dictionary;
pub mod errors;
pub mod request;

pub use dictionary::{Dictionary, PhonemeList, BREATH, SILENCE};
pub use errors::DomainError;
pub use request::{F0Curve, Phoneme, SynthesisRequest};
