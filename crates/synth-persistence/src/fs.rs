//! Store de resultados sobre sistema de archivos.
//!
//! Cada resultado vive en `<root>/<fingerprint>.<ext>`. La escritura va a un
//! archivo temporal oculto en el mismo directorio, se sincroniza y se renombra
//! sobre el destino: un lector ve el archivo completo o no lo ve.
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use synth_core::{FingerprintId, ResultStore, StoreError};

use crate::config::StoreConfig;
use crate::error::PersistenceError;

#[derive(Debug, Clone)]
pub struct FsResultStore {
    root: PathBuf,
    extension: String,
}

impl FsResultStore {
    /// Abre (o prepara) el store. El directorio se crea en la primera
    /// escritura si todavía no existe.
    pub fn open(config: StoreConfig) -> Result<Self, PersistenceError> {
        config.validate()?;
        if config.root.exists() && !config.root.is_dir() {
            return Err(PersistenceError::NotADirectory(config.root.display().to_string()));
        }
        log::info!("result store at '{}' (*.{})", config.root.display(), config.extension);
        Ok(Self { root: config.root,
                  extension: config.extension })
    }

    pub fn from_env() -> Result<Self, PersistenceError> {
        Self::open(StoreConfig::from_env()?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, id: &FingerprintId) -> PathBuf {
        self.root.join(format!("{}.{}", id.as_str(), self.extension))
    }

    fn temp_path(&self, id: &FingerprintId) -> PathBuf {
        self.root.join(format!(".{}.{}.tmp", id.as_str(), uuid::Uuid::new_v4().simple()))
    }

    fn write_atomic(&self, id: &FingerprintId, bytes: &[u8]) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.root)?;
        let target = self.path_of(id);
        if target.exists() {
            log::warn!("result for '{id}' already stored; keeping existing file");
            return Ok(());
        }
        let tmp = self.temp_path(id);
        let written = (|| -> io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&tmp, &target)
        })();
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        log::debug!("stored {} bytes at '{}'", bytes.len(), target.display());
        Ok(())
    }

    fn read_file(&self, id: &FingerprintId) -> Result<Vec<u8>, PersistenceError> {
        match fs::read(self.path_of(id)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(PersistenceError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

impl ResultStore for FsResultStore {
    fn exists(&self, id: &FingerprintId) -> bool {
        self.path_of(id).is_file()
    }

    fn write(&self, id: &FingerprintId, bytes: &[u8]) -> Result<(), StoreError> {
        Ok(self.write_atomic(id, bytes)?)
    }

    fn read(&self, id: &FingerprintId) -> Result<Vec<u8>, StoreError> {
        Ok(self.read_file(id)?)
    }
}
