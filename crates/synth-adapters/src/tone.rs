//! Sintetizador de referencia: seno continuo en fase que sigue la f0 por frame.
//!
//! Ocupa el lugar del modelo acústico + vocoder. Es determinista: dos requests
//! iguales producen exactamente los mismos bytes. `speedup` sólo afecta al
//! fingerprint.
use std::f64::consts::TAU;
use std::path::PathBuf;

use synth_core::{CoreError, Pipeline, PipelineError};
use synth_domain::{PhonemeList, SynthesisRequest, BREATH, SILENCE};

use crate::models::model_path;
use crate::preprocess::{preprocess, AcousticInput, FrameGeometry};
use crate::wav::encode_pcm16_mono;

const AMPLITUDE: f64 = 0.5;
/// Duración máxima por defecto de un request (segundos).
pub const DEFAULT_MAX_DURATION_SECS: f64 = 600.0;

#[derive(Debug, Clone)]
pub struct ToneConfig {
    pub sample_rate: u32,
    pub hop_size: u32,
    pub default_speedup: u32,
    /// Si está presente, `prepare` exige que `<dir>/<model>.onnx` exista.
    pub model_dir: Option<PathBuf>,
    /// Duración total máxima aceptada (segundos). Acota la memoria de `run`.
    pub max_duration_secs: f64,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self { sample_rate: 44_100,
               hop_size: 512,
               default_speedup: 10,
               model_dir: None,
               max_duration_secs: DEFAULT_MAX_DURATION_SECS }
    }
}

#[derive(Debug, Clone)]
pub struct ToneSynthesizer {
    geometry: FrameGeometry,
    default_speedup: u32,
    model_dir: Option<PathBuf>,
    vocabulary: Option<PhonemeList>,
    max_duration_secs: f64,
    max_frames: usize,
}

impl ToneSynthesizer {
    pub fn new(config: ToneConfig) -> Result<Self, CoreError> {
        let geometry = FrameGeometry::new(config.sample_rate, config.hop_size).map_err(|e| CoreError::validation(e.to_string()))?;
        let max = config.max_duration_secs;
        if !max.is_finite() || max <= 0.0 {
            return Err(CoreError::validation(format!("max duration must be positive, got {max}")));
        }
        // límite acumulado redondeado: a lo sumo un frame más que max / frame
        let max_frames = ((max / geometry.frame_secs()).ceil() as usize).saturating_add(1);
        Ok(Self { geometry,
                  default_speedup: config.default_speedup.max(1),
                  model_dir: config.model_dir,
                  vocabulary: None,
                  max_duration_secs: max,
                  max_frames })
    }

    /// Restringe los fonemas aceptados al vocabulario dado.
    pub fn with_vocabulary(mut self, vocabulary: PhonemeList) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    fn render(&self, input: &AcousticInput) -> Result<Vec<f32>, PipelineError> {
        let hop = self.geometry.hop_size as usize;
        let sr = f64::from(self.geometry.sample_rate);
        let total = input.total_frames()
                         .checked_mul(hop)
                         .ok_or_else(|| PipelineError::new("sample count overflows"))?;
        let mut samples = Vec::new();
        samples.try_reserve_exact(total)
               .map_err(|e| PipelineError::new(format!("cannot allocate {total} samples: {e}")))?;
        let mut phase = 0.0f64;
        for (name, &hz) in input.frame_phonemes().zip(&input.f0) {
            if name == SILENCE || name == BREATH || hz <= 0.0 {
                samples.extend(std::iter::repeat(0.0f32).take(hop));
                continue;
            }
            let step = TAU * hz / sr;
            for _ in 0..hop {
                samples.push((AMPLITUDE * phase.sin()) as f32);
                phase = (phase + step) % TAU;
            }
        }
        Ok(samples)
    }
}

impl Pipeline for ToneSynthesizer {
    type Request = SynthesisRequest;

    fn prepare(&self, request: SynthesisRequest) -> Result<SynthesisRequest, CoreError> {
        let request = request.with_defaults(self.default_speedup);
        request.validate().map_err(|e| CoreError::validation(e.to_string()))?;
        let total = request.total_duration();
        if total > self.max_duration_secs {
            return Err(CoreError::validation(format!("total duration {total}s exceeds the limit of {}s",
                                                     self.max_duration_secs)));
        }
        if let Some(dir) = &self.model_dir {
            if !model_path(dir, &request.model).is_file() {
                return Err(CoreError::validation(format!("unknown model '{}'", request.model)));
            }
        }
        if let Some(vocab) = &self.vocabulary {
            if let Some(bad) = request.phonemes.iter().find(|p| !vocab.contains(&p.name)) {
                return Err(CoreError::validation(format!("unknown phoneme '{}'", bad.name)));
            }
        }
        Ok(request)
    }

    fn run(&self, request: &SynthesisRequest) -> Result<Vec<u8>, PipelineError> {
        let input = preprocess(request, self.geometry, self.vocabulary.as_ref(), self.max_frames).map_err(|e| PipelineError::new(e.to_string()))?;
        log::debug!("rendering {} frames for model '{}'", input.total_frames(), request.model);
        let samples = self.render(&input)?;
        encode_pcm16_mono(&samples, self.geometry.sample_rate).map_err(|e| PipelineError::new(e.to_string()))
    }
}
