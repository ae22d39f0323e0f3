//! Diccionario de fonemas.
//!
//! Formato: una regla por línea, `sílaba<TAB>fonema1 fonema2 ...`. Las líneas
//! vacías se ignoran. La lista de fonemas (vocabulario del modelo acústico)
//! empieza con `pad` posiciones reservadas y sigue con el conjunto ordenado de
//! todos los fonemas más `AP` y `SP`; el índice en esa lista es el token que
//! consume el modelo.
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::errors::DomainError;

/// Fonema de respiración.
pub const BREATH: &str = "AP";
/// Fonema de silencio.
pub const SILENCE: &str = "SP";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    rules: BTreeMap<String, Vec<String>>,
}

impl Dictionary {
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let mut rules = BTreeMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let Some((syllable, phonemes)) = line.split_once('\t') else {
                return Err(DomainError::MalformedDictionary { line: idx + 1,
                                                              reason: "expected '<syllable>\\t<phonemes>'".into() });
            };
            let phonemes: Vec<String> = phonemes.split_whitespace().map(str::to_string).collect();
            if phonemes.is_empty() {
                return Err(DomainError::MalformedDictionary { line: idx + 1,
                                                              reason: format!("syllable '{syllable}' has no phonemes") });
            }
            rules.insert(syllable.trim().to_string(), phonemes);
        }
        Ok(Self { rules })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let dict = Self::parse(&text)?;
        log::info!("loaded dictionary from '{}' ({} syllables)", path.display(), dict.len());
        Ok(dict)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn phonemes_of(&self, syllable: &str) -> Option<&[String]> {
        self.rules.get(syllable).map(Vec::as_slice)
    }

    /// Vocabulario del modelo: `pad` huecos reservados + fonemas ordenados.
    pub fn phoneme_list(&self, pad: usize) -> PhonemeList {
        let mut set: BTreeSet<&str> = BTreeSet::from([BREATH, SILENCE]);
        for seq in self.rules.values() {
            set.extend(seq.iter().map(String::as_str));
        }
        PhonemeList { pad,
                      names: set.into_iter().map(str::to_string).collect() }
    }
}

/// Vocabulario de fonemas con tokens estables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonemeList {
    pad: usize,
    names: Vec<String>,
}

impl PhonemeList {
    /// Vocabulario mínimo (sólo `AP` y `SP`), útil sin diccionario.
    pub fn minimal(pad: usize) -> Self {
        Dictionary::default().phoneme_list(pad)
    }

    pub fn token_of(&self, name: &str) -> Option<usize> {
        self.names
            .binary_search_by(|n| n.as_str().cmp(name))
            .ok()
            .map(|i| i + self.pad)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.token_of(name).is_some()
    }

    /// Número de tokens, contando los reservados.
    pub fn len(&self) -> usize {
        self.pad + self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
