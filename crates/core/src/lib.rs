//! Core codec for the MOBF binary container format
//!
//! This crate holds the leaves every other MOBF crate builds on:
//! - `codec`: exact-width big-endian readers/writers and the string codec
//! - `timestamp`: partially populated calendar values and their bit-packed encoding
//! - `charset`: header charsets and their string encodings
//! - `type_id`: stable one-byte wire ids and value categories
//! - `error`: the error taxonomy shared by the whole workspace

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod charset;
pub mod codec;
pub mod error;
pub mod timestamp;
pub mod type_id;

pub use charset::Charset;
pub use codec::{MobfRead, MobfWrite, STRING_LEN_PREFIX};
pub use error::{ErrorCategory, MobfError, MobfResult};
pub use timestamp::{SubSecond, SubSecondUnit, Timestamp, UtcOffset};
pub use type_id::{Category, TypeId};
