use thiserror::Error;

/// Errores del dominio de síntesis.
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("dictionary line {line}: {reason}")]
    MalformedDictionary { line: usize, reason: String },
    #[error("dictionary io: {0}")]
    Io(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_format() {
        assert_eq!(DomainError::Validation("x".into()).to_string(), "validation failed: x");
    }

    #[test]
    fn malformed_dictionary_format() {
        let err = DomainError::MalformedDictionary { line: 3,
                                                     reason: "missing tab".into() };
        assert_eq!(err.to_string(), "dictionary line 3: missing tab");
    }
}
