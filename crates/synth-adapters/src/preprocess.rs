//! Preparación acústica: del request a la rejilla de frames.
//!
//! Un frame dura `hop_size / sample_rate` segundos. Las duraciones de los
//! fonemas se acumulan, se convierten a límites de frame con
//! `round(cumsum / frame + 0.5)` (redondeo a par) y se diferencian para obtener
//! los frames de cada fonema. La curva de f0 se remuestrea sobre la misma
//! rejilla por interpolación lineal y se recorta o extiende con su último valor
//! hasta cubrir todos los frames.
use synth_domain::{PhonemeList, SynthesisRequest};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PreprocessError {
    #[error("unknown phoneme '{0}'")]
    UnknownPhoneme(String),
    #[error("invalid frame geometry: hop_size {hop_size}, sample_rate {sample_rate}")]
    Geometry { hop_size: u32, sample_rate: u32 },
    #[error("request needs {frames} frames, limit is {limit}")]
    TooManyFrames { frames: usize, limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub sample_rate: u32,
    pub hop_size: u32,
}

impl FrameGeometry {
    pub fn new(sample_rate: u32, hop_size: u32) -> Result<Self, PreprocessError> {
        if sample_rate == 0 || hop_size == 0 {
            return Err(PreprocessError::Geometry { hop_size, sample_rate });
        }
        Ok(Self { sample_rate, hop_size })
    }

    /// Segundos por frame.
    pub fn frame_secs(&self) -> f64 {
        f64::from(self.hop_size) / f64::from(self.sample_rate)
    }
}

/// Entrada del modelo acústico alineada a frames.
#[derive(Debug, Clone, PartialEq)]
pub struct AcousticInput {
    /// Nombres de fonema en orden.
    pub phonemes: Vec<String>,
    /// Tokens del vocabulario; vacío si no hay vocabulario configurado.
    pub tokens: Vec<usize>,
    /// Frames por fonema.
    pub durations: Vec<usize>,
    /// f0 por frame (Hz).
    pub f0: Vec<f64>,
}

impl AcousticInput {
    pub fn total_frames(&self) -> usize {
        self.durations.iter().sum()
    }

    /// Nombre del fonema activo en cada frame.
    pub fn frame_phonemes(&self) -> impl Iterator<Item = &str> + '_ {
        self.phonemes
            .iter()
            .zip(&self.durations)
            .flat_map(|(name, &n)| std::iter::repeat(name.as_str()).take(n))
    }
}

/// Límites acumulados de frame por fonema y su diferencia.
pub fn frame_durations(durations: &[f64], frame_secs: f64) -> Vec<usize> {
    let mut acc = 0.0;
    let mut prev = 0usize;
    let mut out = Vec::with_capacity(durations.len());
    for d in durations {
        acc += d;
        let boundary = (acc / frame_secs + 0.5).round_ties_even().max(0.0) as usize;
        // límites monótonos: una duración 0 da 0 frames
        let boundary = boundary.max(prev);
        out.push(boundary - prev);
        prev = boundary;
    }
    out
}

/// Remuestrea `values` (paso `timestep`) sobre la rejilla de frames y ajusta
/// la longitud a `total_frames`.
pub fn resample_f0(values: &[f64], timestep: f64, frame_secs: f64, total_frames: usize) -> Vec<f64> {
    let Some(&last) = values.last() else {
        return vec![0.0; total_frames];
    };
    let t_max = (values.len() - 1) as f64 * timestep;
    let mut out = Vec::with_capacity(total_frames);
    let mut i = 0usize;
    loop {
        let t = i as f64 * frame_secs;
        if t >= t_max || out.len() == total_frames {
            break;
        }
        let pos = t / timestep;
        let lo = (pos.floor() as usize).min(values.len() - 1);
        let hi = (lo + 1).min(values.len() - 1);
        let frac = pos - lo as f64;
        out.push(values[lo] + (values[hi] - values[lo]) * frac);
        i += 1;
    }
    out.resize(total_frames, last);
    out
}

/// Convierte el request en entrada del modelo. Con vocabulario, cada fonema
/// debe existir en él. Falla antes de reservar memoria si el request ocupa
/// más de `max_frames` frames.
pub fn preprocess(request: &SynthesisRequest,
                  geometry: FrameGeometry,
                  vocabulary: Option<&PhonemeList>,
                  max_frames: usize)
                  -> Result<AcousticInput, PreprocessError> {
    let phonemes: Vec<String> = request.phonemes.iter().map(|p| p.name.clone()).collect();
    let tokens = match vocabulary {
        Some(list) => phonemes.iter()
                              .map(|name| list.token_of(name).ok_or_else(|| PreprocessError::UnknownPhoneme(name.clone())))
                              .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    let seconds: Vec<f64> = request.phonemes.iter().map(|p| p.duration).collect();
    let frame = geometry.frame_secs();
    let durations = frame_durations(&seconds, frame);
    let total = durations.iter().fold(0usize, |acc, &n| acc.saturating_add(n));
    if total > max_frames {
        return Err(PreprocessError::TooManyFrames { frames: total,
                                                    limit: max_frames });
    }
    let f0 = resample_f0(&request.f0.values, request.f0.timestep, frame, total);
    Ok(AcousticInput { phonemes,
                       tokens,
                       durations,
                       f0 })
}
