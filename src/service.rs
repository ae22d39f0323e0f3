//! Ensamblado del servicio: store en disco + sintetizador + executor.
use std::sync::Arc;

use serde::Serialize;
use synth_adapters::{list_models, ToneConfig, ToneSynthesizer};
use synth_core::{Executor, ExecutorConfig, Orchestrator};
use synth_domain::Dictionary;
use synth_persistence::FsResultStore;
use tokio::runtime::Handle;

use crate::config::AppConfig;
use crate::errors::AppError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const RELEASE_DATE: &str = "2026-10-16";

pub type SynthOrchestrator = Orchestrator<FsResultStore, ToneSynthesizer>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub date: &'static str,
}

pub fn version() -> VersionInfo {
    VersionInfo { version: VERSION,
                  date: RELEASE_DATE }
}

#[derive(Debug, Clone)]
pub struct SynthService {
    config: AppConfig,
    orchestrator: SynthOrchestrator,
}

impl SynthService {
    /// Construye el servicio. Las tareas corren sobre `runtime`.
    pub fn from_config(config: &AppConfig, runtime: Handle) -> Result<Self, AppError> {
        let store = FsResultStore::open(config.store.clone())?;

        let model_dir = config.acoustic.model_dir.is_dir().then(|| config.acoustic.model_dir.clone());
        if model_dir.is_none() {
            log::warn!("acoustic model directory '{}' not found; model names are not checked",
                       config.acoustic.model_dir.display());
        }
        let mut synth = ToneSynthesizer::new(ToneConfig { sample_rate: config.vocoder.sample_rate,
                                                          hop_size: config.vocoder.hop_size,
                                                          default_speedup: config.acoustic.speedup,
                                                          model_dir,
                                                          max_duration_secs: config.acoustic.max_duration_secs })?;
        if let Some(path) = &config.dictionary.filename {
            let dict = Dictionary::load(path)?;
            synth = synth.with_vocabulary(dict.phoneme_list(config.dictionary.reserved_tokens));
        }

        let mut exec_config = ExecutorConfig::with_workers(config.server.max_threads);
        if let Some(deadline) = config.server.task_deadline {
            exec_config = exec_config.with_deadline(deadline);
        }
        let executor = Executor::new(exec_config, runtime);
        log::info!("synthesis service ready ({} workers)", executor.workers());

        Ok(Self { config: config.clone(),
                  orchestrator: Orchestrator::new(Arc::new(store), Arc::new(synth), executor) })
    }

    pub fn orchestrator(&self) -> &SynthOrchestrator {
        &self.orchestrator
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Modelos acústicos disponibles.
    pub fn models(&self) -> Result<Vec<String>, AppError> {
        Ok(list_models(&self.config.acoustic.model_dir)?)
    }
}
