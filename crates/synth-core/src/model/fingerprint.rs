//! Fingerprint de requests.
//!
//! Un `FingerprintId` identifica de forma estable el contenido semántico de un
//! request: se calcula sobre su JSON canónico (claves ordenadas), por lo que
//! no depende del orden de los campos ni del proceso que lo calcula. No es una
//! frontera de seguridad; basta con que las colisiones accidentales sean
//! despreciables.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::FINGERPRINT_HEX_LEN;
use crate::errors::CoreError;
use crate::hashing::hash_value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FingerprintId(String);

impl FingerprintId {
    /// Valida un token recibido del exterior: exactamente 64 hex en minúscula.
    pub fn parse(token: &str) -> Result<Self, CoreError> {
        let valid = token.len() == FINGERPRINT_HEX_LEN
                    && token.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(Self(token.to_string()))
        } else {
            Err(CoreError::InvalidFingerprint(token.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FingerprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FingerprintId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FingerprintId> for String {
    fn from(value: FingerprintId) -> Self {
        value.0
    }
}

/// Calcula el fingerprint de cualquier request serializable.
///
/// Los valores por defecto deben estar ya rellenados: un campo omitido y el
/// mismo campo con su valor por defecto sólo colisionan si el llamador los
/// normaliza antes (ver `Pipeline::prepare`).
pub fn fingerprint_of<T: Serialize>(request: &T) -> Result<FingerprintId, CoreError> {
    let value = serde_json::to_value(request)?;
    Ok(FingerprintId(hash_value(&value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_order_does_not_matter() {
        let a = json!({"model": "m1", "speedup": 10, "f0": {"timestep": 0.01, "values": [440.0]}});
        let b = json!({"f0": {"values": [440.0], "timestep": 0.01}, "speedup": 10, "model": "m1"});
        assert_eq!(fingerprint_of(&a).unwrap(), fingerprint_of(&b).unwrap());
    }

    #[test]
    fn different_content_differs() {
        let a = fingerprint_of(&json!({"model": "m1"})).unwrap();
        let b = fingerprint_of(&json!({"model": "m2"})).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_rejects_foreign_tokens() {
        let fp = fingerprint_of(&json!({"x": 1})).unwrap();
        assert_eq!(FingerprintId::parse(fp.as_str()).unwrap(), fp);
        assert!(FingerprintId::parse("../../etc/passwd").is_err());
        assert!(FingerprintId::parse(&fp.as_str().to_uppercase()).is_err());
        assert!(FingerprintId::parse(&fp.as_str()[..63]).is_err());
    }

    #[test]
    fn serde_roundtrip_validates() {
        let fp = fingerprint_of(&json!({"x": 1})).unwrap();
        let s = serde_json::to_string(&fp).unwrap();
        let back: FingerprintId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, fp);
        assert!(serde_json::from_str::<FingerprintId>("\"nope\"").is_err());
    }
}
