//! Codificación WAV: PCM 16 bits, mono, little-endian.
use thiserror::Error;

const HEADER_LEN: usize = 44;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WavError {
    #[error("{samples} samples do not fit in a RIFF chunk")]
    TooLong { samples: usize },
    #[error("sample rate {0} does not fit a 16-bit mono byte rate")]
    SampleRate(u32),
}

/// Tamaño del chunk `data` en bytes; RIFF lo limita a 32 bits (y la cabecera
/// suma 36 más).
fn data_len(samples: usize) -> Result<u32, WavError> {
    samples.checked_mul(2)
           .and_then(|bytes| u32::try_from(bytes).ok())
           .filter(|bytes| bytes.checked_add(36).is_some())
           .ok_or(WavError::TooLong { samples })
}

/// Codifica muestras en [-1, 1] (fuera de rango se recortan).
pub fn encode_pcm16_mono(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, WavError> {
    let data_len = data_len(samples.len())?;
    let byte_rate = sample_rate.checked_mul(2).ok_or(WavError::SampleRate(sample_rate))?;
    let mut out = Vec::with_capacity(HEADER_LEN + samples.len() * 2);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // canales
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        let v = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16;
        out.extend_from_slice(&v.to_le_bytes());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(buf: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
    }

    #[test]
    fn header_layout() {
        let wav = encode_pcm16_mono(&[0.0; 10], 8000).unwrap();
        assert_eq!(wav.len(), HEADER_LEN + 20);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4), 36 + 20);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u32_at(&wav, 24), 8000);
        assert_eq!(u32_at(&wav, 28), 16000);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), 20);
    }

    #[test]
    fn samples_are_clamped() {
        let wav = encode_pcm16_mono(&[2.0, -2.0], 8000).unwrap();
        assert_eq!(i16::from_le_bytes([wav[44], wav[45]]), i16::MAX);
        assert_eq!(i16::from_le_bytes([wav[46], wav[47]]), -i16::MAX);
    }

    #[test]
    fn oversized_data_is_rejected_not_truncated() {
        assert_eq!(data_len(1_000), Ok(2_000));
        let too_many = (u32::MAX / 2) as usize;
        assert_eq!(data_len(too_many), Err(WavError::TooLong { samples: too_many }));
        assert!(data_len(usize::MAX).is_err());
    }

    #[test]
    fn huge_sample_rate_is_rejected() {
        assert_eq!(encode_pcm16_mono(&[], u32::MAX), Err(WavError::SampleRate(u32::MAX)));
    }
}
