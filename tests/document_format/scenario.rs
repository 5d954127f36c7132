//! The `id` / `user` / `tags` document, byte for byte.

use crate::common::*;

#[test]
fn id_user_tags_round_trip() {
    let mut document = sample_document();
    let decoded = round_trip(&mut document);

    assert_eq!(decoded.root_name(), "");
    let root = decoded.root_object();
    assert_eq!(root.len(), 3);
    assert_eq!(root.get("id").unwrap().type_id(), TypeId::Int);
    assert_eq!(root.get("id").unwrap().as_int(), Some(1));
    assert_eq!(root.get("user").unwrap().type_id(), TypeId::String);
    assert_eq!(root.get("user").unwrap().as_str(), Some("abc"));

    let tags = root.get("tags").unwrap().as_list().unwrap();
    assert_eq!(tags.element_type(), Some(TypeId::String));
    let values: Vec<_> = tags.iter().map(|t| t.as_str().unwrap()).collect();
    assert_eq!(values, vec!["a", "b"]);
    let names: Vec<_> = tags.iter().map(|t| t.name().unwrap()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn id_user_tags_wire_bytes() {
    let bytes = sample_document().to_bytes().unwrap();
    let parts: [&[u8]; 10] = [
        &b"MOBF"[..],
        &[0x01, mobf::FORMAT_VERSION, 0, 0],
        &[1, 0, 0, 0, 0],                       // root: Object, name ""
        &[5, 0, 0, 0, 2, b'i', b'd', 0, 0, 0, 1], // id: Int 1
        &[9, 0, 0, 0, 4, b'u', b's', b'e', b'r', 0, 0, 0, 3, b'a', b'b', b'c'],
        &[11, 0, 0, 0, 4, b't', b'a', b'g', b's'], // tags: List
        &[9, 0, 0, 0, 2],                       // of 2 Strings
        &[0, 0, 0, 1, b'a', 0, 0, 0, 1, b'a'],
        &[0, 0, 0, 1, b'b', 0, 0, 0, 1, b'b'],
        &[0], // root terminator
    ];
    assert_eq!(bytes, parts.concat());
}
