//! Carga de configuración del store desde variables de entorno.
//! Usa `SYNTH_CACHE_DIR` y `SYNTH_CACHE_EXT`.

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::PersistenceError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const DEFAULT_CACHE_DIR: &str = "cache";
pub const DEFAULT_CACHE_EXT: &str = "wav";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub extension: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { root: PathBuf::from(DEFAULT_CACHE_DIR),
               extension: DEFAULT_CACHE_EXT.to_string() }
    }
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(),
               ..Self::default() }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn from_env() -> Result<Self, PersistenceError> {
        Lazy::force(&DOTENV_LOADED);
        let root = env::var("SYNTH_CACHE_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(DEFAULT_CACHE_DIR));
        let extension = env::var("SYNTH_CACHE_EXT").unwrap_or_else(|_| DEFAULT_CACHE_EXT.to_string());
        let config = Self { root, extension };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PersistenceError> {
        let ext = self.extension.as_str();
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PersistenceError::InvalidConfig { key: "SYNTH_CACHE_EXT".into(),
                                                         value: ext.to_string(),
                                                         reason: "expected a plain alphanumeric extension".into() });
        }
        Ok(())
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_loads_once_for_every_caller() {
        init_dotenv();
        init_dotenv();
        let first = StoreConfig::from_env().map_err(|e| e.to_string());
        let second = StoreConfig::from_env().map_err(|e| e.to_string());
        assert_eq!(first, second);
    }

    #[test]
    fn extension_must_be_plain() {
        assert!(StoreConfig::default().validate().is_ok());
        assert!(StoreConfig::new("x").with_extension("").validate().is_err());
        assert!(StoreConfig::new("x").with_extension("../wav").validate().is_err());
    }
}
