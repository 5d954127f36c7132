//! decode(encode(D)) == D for arbitrary value trees.

use crate::common::*;
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Payload> {
    prop_oneof![
        any::<bool>().prop_map(Payload::Boolean),
        any::<i8>().prop_map(Payload::Byte),
        any::<i16>().prop_map(Payload::Short),
        any::<i32>().prop_map(Payload::Int),
        any::<i64>().prop_map(Payload::Long),
        (-1.0e6f32..1.0e6f32).prop_map(Payload::Float),
        (-1.0e12f64..1.0e12f64).prop_map(Payload::Double),
        "\\PC{0,12}".prop_map(Payload::String),
        (0u16..=9999, 1u8..=12).prop_map(|(year, month)| {
            Payload::Timestamp(Timestamp::new().with_year(year).with_month(month).unwrap())
        }),
    ]
}

fn payload() -> impl Strategy<Value = Payload> {
    leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(("[a-z]{1,6}", inner.clone()), 0..6).prop_map(|entries| {
                let mut object = ObjectValue::new();
                for (name, payload) in entries {
                    object.add(TypedValue::new(name, payload)).unwrap();
                }
                Payload::Object(object)
            }),
            prop::collection::vec(inner, 0..4).prop_map(|payloads| {
                // Wrap each payload in an object so the list stays homogeneous
                let elements = payloads.into_iter().enumerate().map(|(i, payload)| {
                    let object = ObjectValue::from_values([TypedValue::new("v", payload)]).unwrap();
                    TypedValue::new(format!("e{}", i), object)
                });
                Payload::List(ListValue::from_values(elements).unwrap())
            }),
            prop::collection::vec(("[a-z]{0,4}", any::<i64>()), 0..6).prop_map(|elements| {
                let elements = elements
                    .into_iter()
                    .map(|(name, value)| TypedValue::new(name, value));
                Payload::List(ListValue::from_values(elements).unwrap())
            }),
            prop::collection::vec(any::<i16>(), 0..8)
                .prop_map(|values| Payload::Array(ArrayValue::from_payloads(values).unwrap())),
            prop::collection::vec(any::<bool>(), 1..8)
                .prop_map(|values| Payload::Array(ArrayValue::from_payloads(values).unwrap())),
        ]
    })
}

fn document() -> impl Strategy<Value = Document> {
    ("[a-z]{0,6}", prop::collection::vec(("[a-z]{1,8}", payload()), 0..8)).prop_map(
        |(root_name, entries)| {
            let mut root = ObjectValue::new();
            for (name, payload) in entries {
                root.add(TypedValue::new(name, payload)).unwrap();
            }
            Document::new().with_root(root_name, root)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn decode_of_encode_is_identity(mut original in document()) {
        let decoded = round_trip(&mut original);
        prop_assert_eq!(&decoded, &original);
        prop_assert!(!decoded.is_modified());
    }

    #[test]
    fn re_encoding_is_byte_stable(mut original in document()) {
        let first = original.to_bytes().unwrap();
        let mut decoded = Document::from_bytes(&first).unwrap();
        let second = decoded.to_bytes().unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn empty_containers_survive() {
    let mut document = Document::new();
    let root = document.root_object_mut();
    root.add(TypedValue::new("object", ObjectValue::new())).unwrap();
    root.add(TypedValue::new("list", ListValue::new())).unwrap();
    root.add(TypedValue::new("array", ArrayValue::new())).unwrap();
    root.add(TypedValue::new("after", 9i32)).unwrap();

    let decoded = round_trip(&mut document);
    let root = decoded.root_object();
    assert!(root.get("object").unwrap().as_object().unwrap().is_empty());
    assert!(root.get("list").unwrap().as_list().unwrap().is_empty());
    assert!(root.get("array").unwrap().as_array().unwrap().is_empty());
    // Field after the empty containers is still where it belongs
    assert_eq!(root.get("after").unwrap().as_int(), Some(9));
}

#[test]
fn insertion_order_preserved() {
    let mut document = Document::new();
    for name in ["zeta", "alpha", "mid"] {
        document
            .root_object_mut()
            .add(TypedValue::new(name, true))
            .unwrap();
    }
    let decoded = round_trip(&mut document);
    assert_eq!(
        decoded.root_object().names().collect::<Vec<_>>(),
        vec!["zeta", "alpha", "mid"]
    );
}
