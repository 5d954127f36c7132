//! UTF-16 documents encode every string, names included, as UTF-16BE.

use crate::common::*;
use mobf::Header;

fn utf16_document() -> Document {
    let mut document = Document::with_header(Header::new(Charset::Utf16, 1));
    let root = document.root_object_mut();
    root.add(TypedValue::new("greeting", "héllo wörld")).unwrap();
    root.add(TypedValue::new("emoji", "🦀 crab")).unwrap();
    root.add(TypedValue::new(
        "list",
        ListValue::from_values([TypedValue::new("ключ", "значение")]).unwrap(),
    ))
    .unwrap();
    document
}

#[test]
fn utf16_round_trip() {
    let mut document = utf16_document();
    let decoded = round_trip(&mut document);
    assert_eq!(decoded.header().charset(), Charset::Utf16);
    assert_eq!(decoded, document);
    assert_eq!(
        decoded.root_object().get("emoji").unwrap().as_str(),
        Some("🦀 crab")
    );
}

#[test]
fn utf16_name_bytes() {
    let bytes = Document::with_header(Header::new(Charset::Utf16, 1))
        .with_root("ab", ObjectValue::new())
        .to_bytes()
        .unwrap();
    assert_eq!(bytes[4], 0x02);
    // Object id, then "ab" as two big-endian code units
    assert_eq!(
        &bytes[mobf::HEADER_SIZE..],
        &[1, 0, 0, 0, 4, 0, b'a', 0, b'b', 0]
    );
}

#[test]
fn store_uses_configured_charset() {
    let source = MemorySource::new();
    let config = StoreConfig::default().with_charset(Charset::Utf16);
    let store = DocumentStore::create(source.clone(), config).unwrap();
    store
        .with_document_mut(|doc| {
            doc.root_object_mut()
                .add(TypedValue::new("k", "v"))
                .unwrap();
        })
        .unwrap();
    store.write(false).unwrap();

    let decoded = Document::from_bytes(&source.bytes().unwrap()).unwrap();
    assert_eq!(decoded.header().charset(), Charset::Utf16);
    assert_eq!(decoded.root_object().get("k").unwrap().as_str(), Some("v"));
}

#[test]
fn invalid_utf8_string_is_corruption() {
    let mut bytes = Document::new().with_root("x", ObjectValue::new()).to_bytes().unwrap();
    // Root name byte 'x' -> lone continuation byte
    let name_at = mobf::HEADER_SIZE + 1 + 4;
    bytes[name_at] = 0x80;
    let err = Document::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, MobfError::InvalidString(_)));
    assert_eq!(err.category(), mobf::ErrorCategory::Corruption);
}
