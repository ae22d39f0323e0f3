use std::io::Write;

use synth_domain::{Dictionary, DomainError};

#[test]
fn loads_dictionary_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "ni\tn i").unwrap();
    writeln!(file, "hao\th ao").unwrap();
    let dict = Dictionary::load(file.path()).unwrap();
    assert_eq!(dict.len(), 2);
    let list = dict.phoneme_list(1);
    assert!(list.contains("ao"));
    assert!(list.contains("SP"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Dictionary::load(dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, DomainError::Io(_)));
}
