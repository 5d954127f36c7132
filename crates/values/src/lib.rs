//! Value model for the MOBF container format
//!
//! This crate defines the tree a document is made of:
//! - `value`: [`TypedValue`], the named payload with a modified flag, and [`Payload`]
//! - `object`: named, insertion-ordered children
//! - `list`: homogeneous, named, ordered elements
//! - `array`: homogeneous, anonymous primitive elements
//! - `registry`: the id → variant lookup used while decoding
//!
//! Every value encodes itself; decoding is driven by a [`TypeRegistry`]
//! that turns wire ids into default instances.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod list;
pub mod object;
pub mod registry;
pub mod value;

pub use array::ArrayValue;
pub use list::ListValue;
pub use object::ObjectValue;
pub use registry::{TypeRegistry, TypeRegistryBuilder};
pub use value::{Payload, TypedValue, MAX_NESTING_DEPTH};
