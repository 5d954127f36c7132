//! Partially populated timestamps inside documents.

use crate::common::*;
use chrono::{FixedOffset, TimeZone};
use mobf::{MobfWrite, SubSecond, SubSecondUnit, UtcOffset};

#[test]
fn year_and_month_only() {
    let ts = Timestamp::new().with_year(2024).with_month(3).unwrap();
    let mut buf = Vec::new();
    assert_eq!(buf.write_timestamp(&ts).unwrap(), 4);
    assert_eq!(buf[0], 0b1100_0000);
    assert_eq!(buf.len() - 1, 3);

    let mut document = Document::new();
    document
        .root_object_mut()
        .add(TypedValue::new("when", ts))
        .unwrap();
    let decoded = round_trip(&mut document);
    let back = decoded.root_object().get("when").unwrap().as_timestamp().unwrap();
    assert_eq!(back.year(), Some(2024));
    assert_eq!(back.month(), Some(3));
    assert_eq!(back.day(), None);
    assert_eq!(back.hour(), None);
    assert_eq!(back.minute(), None);
    assert_eq!(back.second(), None);
    assert_eq!(back.sub_second(), None);
    assert_eq!(back.offset(), None);
}

#[test]
fn fully_populated_survives_document() {
    let ts = Timestamp::new()
        .with_year(1999)
        .with_month(12)
        .unwrap()
        .with_day(31)
        .unwrap()
        .with_hour(23)
        .unwrap()
        .with_minute(59)
        .unwrap()
        .with_second(58)
        .unwrap()
        .with_sub_second(SubSecond::new(SubSecondUnit::Micros, 999).unwrap())
        .with_offset(UtcOffset::from_quarters(-20).unwrap());

    let mut document = Document::new();
    document
        .root_object_mut()
        .add(TypedValue::new("eve", ts))
        .unwrap();
    let decoded = round_trip(&mut document);
    assert_eq!(
        decoded.root_object().get("eve").unwrap().as_timestamp(),
        Some(&ts)
    );
}

#[test]
fn chrono_conversion_through_document() {
    let offset = FixedOffset::east_opt(5 * 3600 + 45 * 60).unwrap();
    let dt = offset.with_ymd_and_hms(2023, 7, 14, 8, 30, 0).unwrap();
    let ts = Timestamp::from_datetime(&dt).unwrap();

    let mut document = Document::new();
    document
        .root_object_mut()
        .add(TypedValue::new("at", ts))
        .unwrap();
    let decoded = round_trip(&mut document);
    let back = decoded.root_object().get("at").unwrap().as_timestamp().unwrap();
    assert_eq!(back.to_datetime(), Some(dt));
}

#[test]
fn empty_timestamp_fails_whole_encode() {
    let mut document = Document::new();
    document
        .root_object_mut()
        .add(TypedValue::new("never", Timestamp::new()))
        .unwrap();
    let err = document.to_bytes().unwrap_err();
    assert!(matches!(err, MobfError::MalformedTimestamp(_)));
    assert!(document.is_modified());
}
