//! Catálogo de modelos acústicos en disco (`<dir>/<nombre>.onnx`).
use std::io;
use std::path::{Path, PathBuf};

pub const MODEL_EXT: &str = "onnx";

pub fn model_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{MODEL_EXT}"))
}

/// Nombres de modelo ordenados. Un directorio inexistente no tiene modelos.
pub fn list_models(dir: &Path) -> io::Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut names = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(MODEL_EXT) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}
