//! File-backed stores: `.mobf` naming, atomic replace, reopen.

use crate::common::*;

#[test]
fn file_gets_mobf_extension() {
    let test = TestStore::create(StoreConfig::default());
    test.store.write(false).unwrap();
    let path = test.store.source().path().to_path_buf();
    assert_eq!(path.extension().unwrap(), "mobf");
    assert!(path.exists());
}

#[test]
fn write_close_reopen() {
    let test = TestStore::create(StoreConfig::default());
    test.store
        .with_document_mut(|doc| {
            let root = doc.root_object_mut();
            root.add(TypedValue::new("name", "primary")).unwrap();
            root.add(TypedValue::new("weight", 0.75f64)).unwrap();
        })
        .unwrap();
    test.store.write(false).unwrap();
    assert!(test.store.close().is_some());

    let reopened = test.reopen(StoreConfig::default());
    assert!(!reopened.is_open());
    reopened.read(false).unwrap();
    let (name, weight) = reopened
        .with_document(|doc| {
            let root = doc.root_object();
            (
                root.get("name").and_then(|v| v.as_str().map(str::to_string)),
                root.get("weight").and_then(TypedValue::as_double),
            )
        })
        .unwrap();
    assert_eq!(name.as_deref(), Some("primary"));
    assert_eq!(weight, Some(0.75));
}

#[test]
fn failed_write_keeps_previous_file() {
    let test = TestStore::create(StoreConfig::default());
    test.store
        .with_document_mut(|doc| {
            doc.root_object_mut()
                .add(TypedValue::new("v", 1i32))
                .unwrap();
        })
        .unwrap();
    test.store.write(false).unwrap();
    let before = std::fs::read(test.store.source().path()).unwrap();

    test.store
        .with_document_mut(|doc| {
            doc.root_object_mut()
                .add(TypedValue::new("broken", Timestamp::new()))
                .unwrap();
        })
        .unwrap();
    assert!(test.store.write(false).is_err());

    assert_eq!(std::fs::read(test.store.source().path()).unwrap(), before);
    let leftovers: Vec<_> = std::fs::read_dir(test.dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 1, "temp file left behind: {:?}", leftovers);
}

#[test]
fn reading_missing_file_is_io_error() {
    let test = TestStore::create(StoreConfig::default());
    let reader = test.reopen(StoreConfig::default());
    let err = reader.read(false).unwrap_err();
    assert!(matches!(err, MobfError::Io(_)));
    assert!(!err.is_data_error());
}

#[test]
fn config_file_drives_store() {
    let test = TestStore::create(StoreConfig::default());
    let config_path = test.dir.path().join(mobf::CONFIG_FILE_NAME);
    std::fs::write(&config_path, "compression = \"gzip\"\n").unwrap();
    let config = StoreConfig::from_file(&config_path).unwrap();

    let gzip = test.reopen(config);
    assert!(matches!(gzip.write(false), Err(MobfError::NoHeaderOrRoot)));

    test.store.write(false).unwrap();
    gzip.read(false).unwrap();
    gzip.write(true).unwrap();
    let bytes = std::fs::read(test.store.source().path()).unwrap();
    assert_eq!(Compression::detect(&bytes), Compression::Gzip);
}
