use synth_core::{fingerprint_of, ResultStore, StoreError};
use synth_persistence::{FsResultStore, PersistenceError, StoreConfig};

fn id(n: u32) -> synth_core::FingerprintId {
    fingerprint_of(&serde_json::json!({ "n": n })).unwrap()
}

#[test]
fn write_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsResultStore::open(StoreConfig::new(dir.path().join("cache"))).unwrap();
    let key = id(1);
    assert!(!store.exists(&key));
    store.write(&key, b"payload").unwrap();
    assert!(store.exists(&key));
    assert_eq!(store.read(&key).unwrap(), b"payload");
    assert_eq!(store.path_of(&key), dir.path().join("cache").join(format!("{key}.wav")));
}

#[test]
fn no_temporary_files_remain() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsResultStore::open(StoreConfig::new(dir.path()).with_extension("bin")).unwrap();
    for n in 0..4 {
        store.write(&id(n), &[n as u8; 32]).unwrap();
    }
    let names: Vec<String> = std::fs::read_dir(dir.path()).unwrap()
                                                          .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                                                          .collect();
    assert_eq!(names.len(), 4);
    assert!(names.iter().all(|n| n.ends_with(".bin") && !n.starts_with('.')));
}

#[test]
fn first_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsResultStore::open(StoreConfig::new(dir.path())).unwrap();
    store.write(&id(7), b"first").unwrap();
    store.write(&id(7), b"second").unwrap();
    assert_eq!(store.read(&id(7)).unwrap(), b"first");
}

#[test]
fn missing_entry_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsResultStore::open(StoreConfig::new(dir.path())).unwrap();
    assert!(matches!(store.read(&id(9)), Err(StoreError::NotFound(_))));
}

#[test]
fn root_must_be_a_directory() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let err = FsResultStore::open(StoreConfig::new(file.path())).unwrap_err();
    assert!(matches!(err, PersistenceError::NotADirectory(_)));
}
