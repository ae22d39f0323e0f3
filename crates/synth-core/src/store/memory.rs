use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::ResultStore;
use crate::errors::StoreError;
use crate::model::FingerprintId;

/// Store en memoria (tests y uso embebido). Cada inserción es atómica por
/// clave; la primera escritura gana.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    inner: DashMap<FingerprintId, Vec<u8>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl ResultStore for InMemoryResultStore {
    fn exists(&self, id: &FingerprintId) -> bool {
        self.inner.contains_key(id)
    }

    fn write(&self, id: &FingerprintId, bytes: &[u8]) -> Result<(), StoreError> {
        match self.inner.entry(id.clone()) {
            Entry::Occupied(_) => {
                log::warn!("result for '{id}' already stored, keeping the first write");
            }
            Entry::Vacant(v) => {
                v.insert(bytes.to_vec());
            }
        }
        Ok(())
    }

    fn read(&self, id: &FingerprintId) -> Result<Vec<u8>, StoreError> {
        self.inner
            .get(id)
            .map(|v| v.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fingerprint_of;

    #[test]
    fn first_write_wins() {
        let store = InMemoryResultStore::new();
        let id = fingerprint_of(&"a").unwrap();
        assert!(!store.exists(&id));
        store.write(&id, b"one").unwrap();
        store.write(&id, b"two").unwrap();
        assert!(store.exists(&id));
        assert_eq!(store.read(&id).unwrap(), b"one");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn read_missing_is_not_found() {
        let store = InMemoryResultStore::new();
        let id = fingerprint_of(&"missing").unwrap();
        assert!(matches!(store.read(&id), Err(StoreError::NotFound(_))));
    }
}
