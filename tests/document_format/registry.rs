//! Decoding through custom registries.

use crate::common::*;
use mobf::TypeRegistryBuilder;

#[test]
fn every_kind_on_distinct_ids() {
    let mut builder = TypeRegistryBuilder::new();
    for (i, kind) in TypeId::VALUES.into_iter().enumerate() {
        builder.register(200 + i as u8, kind).unwrap();
    }
    // Terminator slot is the 13th id and stays reserved
    assert!(builder.register(0, TypeId::Int).is_err());
    assert_eq!(builder.build().len(), TypeId::VALUES.len());
}

#[test]
fn duplicate_id_or_zero_always_fails() {
    for kind in TypeId::VALUES {
        let mut builder = TypeRegistryBuilder::new();
        builder.register(1, kind).unwrap();
        for other in TypeId::VALUES {
            assert!(matches!(
                builder.register(1, other),
                Err(MobfError::DuplicateRegistration(_))
            ));
        }
        assert!(matches!(
            TypeRegistryBuilder::new().register(0, kind),
            Err(MobfError::DuplicateRegistration(_))
        ));
    }
}

#[test]
fn restricted_registry_rejects_unregistered_kinds() {
    let mut builder = TypeRegistryBuilder::new();
    builder.register(TypeId::Object.as_u8(), TypeId::Object).unwrap();
    builder.register(TypeId::Int.as_u8(), TypeId::Int).unwrap();
    let registry = builder.build();

    let bytes = sample_document().to_bytes().unwrap();
    let err = Document::read_from(&bytes[..], &registry).unwrap_err();
    // "user" is a String, the first kind this registry does not know
    assert!(matches!(err, MobfError::UnknownTypeId(9)));

    let source = MemorySource::from_bytes(bytes);
    let store = DocumentStore::open(source, StoreConfig::default())
        .unwrap()
        .with_registry(registry);
    assert!(matches!(store.read(false), Err(MobfError::UnknownTypeId(9))));
    assert!(!store.is_open());
}
