//! Arrays hold primitives of one type; violations write nothing.

use crate::common::*;

#[test]
fn heterogeneous_array_writes_nothing() {
    let source = MemorySource::from_bytes(b"previous".to_vec());
    let store = DocumentStore::create(source.clone(), StoreConfig::default()).unwrap();
    store
        .with_document_mut(|doc| {
            doc.root_object_mut()
                .add(TypedValue::new(
                    "mixed",
                    ArrayValue::from_elements_unchecked(vec![
                        TypedValue::anonymous(1i32),
                        TypedValue::anonymous(1i64),
                    ]),
                ))
                .unwrap();
        })
        .unwrap();

    let err = store.write(true).unwrap_err();
    assert!(matches!(
        err,
        MobfError::HeterogeneousElements {
            index: 1,
            expected: TypeId::Int,
            found: TypeId::Long,
        }
    ));
    assert!(err.is_usage_error());
    assert_eq!(source.bytes().unwrap(), b"previous");
    assert!(store.with_document(Document::is_modified).unwrap());
}

#[test]
fn non_primitive_first_element_rejected() {
    let mut document = Document::new();
    document
        .root_object_mut()
        .add(TypedValue::new(
            "strings",
            ArrayValue::from_elements_unchecked(vec![TypedValue::anonymous("s")]),
        ))
        .unwrap();
    let err = document.to_bytes().unwrap_err();
    assert!(matches!(err, MobfError::NonPrimitiveElement(TypeId::String)));
}

#[test]
fn every_primitive_kind_round_trips() {
    let arrays = vec![
        ArrayValue::from_payloads([true, false, true]).unwrap(),
        ArrayValue::from_payloads([i8::MIN, 0, i8::MAX]).unwrap(),
        ArrayValue::from_payloads([i16::MIN, i16::MAX]).unwrap(),
        ArrayValue::from_payloads([i32::MIN, -1, i32::MAX]).unwrap(),
        ArrayValue::from_payloads([i64::MIN, i64::MAX]).unwrap(),
        ArrayValue::from_payloads([1.5f32, -0.25]).unwrap(),
        ArrayValue::from_payloads([f64::MAX, f64::MIN_POSITIVE]).unwrap(),
    ];
    let mut root = ObjectValue::new();
    for (i, array) in arrays.into_iter().enumerate() {
        root.add(TypedValue::new(format!("a{}", i), array)).unwrap();
    }
    let mut document = Document::new().with_root("", root);
    let decoded = round_trip(&mut document);
    assert_eq!(decoded.root_object(), document.root_object());
    for element in decoded
        .root_object()
        .iter()
        .flat_map(|a| a.as_array().unwrap().iter())
    {
        assert!(element.name().is_none());
    }
}

#[test]
fn eager_push_checks() {
    let mut array = ArrayValue::new();
    array.push(1.0f64).unwrap();
    assert!(array.push(1.0f32).is_err());
    assert!(array.push(ListValue::new()).is_err());
    assert_eq!(array.len(), 1);
}
