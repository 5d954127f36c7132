//! Modified-flag lifecycle across encode, decode and mutation.

use crate::common::*;

#[test]
fn fresh_value_encode_mutate() {
    let mut value = TypedValue::new("n", 10i64);
    assert!(value.is_modified());

    value.encode(&mut Vec::new(), Charset::Utf8).unwrap();
    assert!(!value.is_modified());

    value.set_payload(11i64);
    assert!(value.is_modified());
}

#[test]
fn decoded_document_is_clean_until_mutated() {
    let mut document = sample_document();
    let mut decoded = round_trip(&mut document);
    assert!(!decoded.is_modified());

    decoded
        .root_object_mut()
        .add(TypedValue::new("extra", false))
        .unwrap();
    assert!(decoded.is_modified());
}

#[test]
fn nested_mutation_does_not_dirty_root() {
    let source = MemorySource::new();
    let store = DocumentStore::create(source.clone(), StoreConfig::default()).unwrap();
    store
        .with_document_mut(|doc| {
            doc.root_object_mut()
                .add(TypedValue::new("inner", ObjectValue::new()))
                .unwrap();
        })
        .unwrap();
    assert!(store.write(false).unwrap());
    let persisted = source.bytes().unwrap();

    // Reach the child without going through the root's mutable accessor
    store
        .with_document_mut(|doc| {
            assert!(!doc.is_modified());
            doc.child_mut("inner")
                .unwrap()
                .as_object_mut()
                .unwrap()
                .add(TypedValue::new("x", 1i32))
                .unwrap();
            assert!(!doc.is_modified());
            assert!(doc.root_object().get("inner").unwrap().is_modified());
        })
        .unwrap();

    // Root is clean, so an unforced write is skipped
    assert!(!store.write(false).unwrap());
    assert_eq!(source.bytes().unwrap(), persisted);
}

#[test]
fn forced_write_persists_clean_document() {
    let source = MemorySource::new();
    let store = DocumentStore::create(source.clone(), StoreConfig::default()).unwrap();
    store.write(false).unwrap();
    assert!(!store.write(false).unwrap());
    assert!(store.write(true).unwrap());
}
