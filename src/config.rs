//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y las agrupa por sección. Los valores que
//! no se pueden interpretar son errores, no se sustituyen por el default.
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use synth_adapters::DEFAULT_MAX_DURATION_SECS;
use synth_persistence::{init_dotenv, StoreConfig};

use crate::errors::AppError;

/// Configuración global de la aplicación.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub acoustic: AcousticConfig,
    pub vocoder: VocoderConfig,
    pub dictionary: DictionaryConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Workers de síntesis simultáneos.
    pub max_threads: usize,
    pub task_deadline: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcousticConfig {
    pub speedup: u32,
    pub model_dir: PathBuf,
    /// Duración total máxima de un request (segundos).
    pub max_duration_secs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VocoderConfig {
    pub sample_rate: u32,
    pub hop_size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryConfig {
    pub filename: Option<PathBuf>,
    /// Tokens reservados al inicio del vocabulario.
    pub reserved_tokens: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { server: ServerConfig { max_threads: 2,
                                      task_deadline: None },
               acoustic: AcousticConfig { speedup: 10,
                                          model_dir: PathBuf::from("assets/acoustic"),
                                          max_duration_secs: DEFAULT_MAX_DURATION_SECS },
               vocoder: VocoderConfig { sample_rate: 44_100,
                                        hop_size: 512 },
               dictionary: DictionaryConfig { filename: None,
                                              reserved_tokens: 1 },
               store: StoreConfig::default() }
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, AppError>
    where T: FromStr,
          T::Err: Display
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim()
                        .parse::<T>()
                        .map(Some)
                        .map_err(|e| AppError::config(key, &raw, e.to_string())),
    }
}

fn at_least_one<T>(key: &str, value: T) -> Result<T, AppError>
    where T: PartialOrd + From<u8> + Display
{
    if value < T::from(1u8) {
        return Err(AppError::config(key, &value.to_string(), "must be at least 1"));
    }
    Ok(value)
}

impl AppConfig {
    /// Lee `.env` (una vez) y las variables `SYNTH_*` del entorno.
    pub fn from_env() -> Result<Self, AppError> {
        init_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let max_threads = parsed::<usize>(&lookup, "SYNTH_MAX_THREADS")?.unwrap_or(defaults.server.max_threads);
        let max_threads = at_least_one("SYNTH_MAX_THREADS", max_threads)?;
        let task_deadline = parsed::<u64>(&lookup, "SYNTH_TASK_DEADLINE_SECS")?.map(Duration::from_secs);

        let speedup = parsed::<u32>(&lookup, "SYNTH_DEFAULT_SPEEDUP")?.unwrap_or(defaults.acoustic.speedup);
        let speedup = at_least_one("SYNTH_DEFAULT_SPEEDUP", speedup)?;
        let model_dir = lookup("SYNTH_ACOUSTIC_DIR").map(PathBuf::from).unwrap_or(defaults.acoustic.model_dir);
        let max_duration_secs =
            parsed::<f64>(&lookup, "SYNTH_MAX_DURATION_SECS")?.unwrap_or(defaults.acoustic.max_duration_secs);
        if !max_duration_secs.is_finite() || max_duration_secs <= 0.0 {
            return Err(AppError::config("SYNTH_MAX_DURATION_SECS",
                                        &max_duration_secs.to_string(),
                                        "must be a positive number of seconds"));
        }

        let sample_rate = parsed::<u32>(&lookup, "SYNTH_SAMPLE_RATE")?.unwrap_or(defaults.vocoder.sample_rate);
        let sample_rate = at_least_one("SYNTH_SAMPLE_RATE", sample_rate)?;
        let hop_size = parsed::<u32>(&lookup, "SYNTH_HOP_SIZE")?.unwrap_or(defaults.vocoder.hop_size);
        let hop_size = at_least_one("SYNTH_HOP_SIZE", hop_size)?;

        let filename = lookup("SYNTH_DICTIONARY").filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        let reserved_tokens = parsed::<usize>(&lookup, "SYNTH_DICT_PAD")?.unwrap_or(defaults.dictionary.reserved_tokens);

        let mut store = defaults.store;
        if let Some(dir) = lookup("SYNTH_CACHE_DIR") {
            store.root = PathBuf::from(dir);
        }
        if let Some(ext) = lookup("SYNTH_CACHE_EXT") {
            store.extension = ext;
        }
        store.validate()?;

        Ok(Self { server: ServerConfig { max_threads,
                                         task_deadline },
                  acoustic: AcousticConfig { speedup,
                                             model_dir,
                                             max_duration_secs },
                  vocoder: VocoderConfig { sample_rate, hop_size },
                  dictionary: DictionaryConfig { filename,
                                                 reserved_tokens },
                  store })
    }
}
