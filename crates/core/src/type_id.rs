//! Wire type identifiers
//!
//! Every value on the wire is preceded by (or, inside lists and arrays,
//! governed by) a single byte naming its variant. These ids are stable:
//! changing one breaks every existing `.mobf` file.
//!
//! | Id | Variant | Category |
//! |----|---------|----------|
//! | 0 | terminator | - |
//! | 1 | Object | Container |
//! | 2 | Byte | Primitive |
//! | 3 | Boolean | Primitive |
//! | 4 | Short | Primitive |
//! | 5 | Int | Primitive |
//! | 6 | Long | Primitive |
//! | 7 | Float | Primitive |
//! | 8 | Double | Primitive |
//! | 9 | String | Advanced |
//! | 10 | Timestamp | Advanced |
//! | 11 | List | Container |
//! | 12 | Array | Container |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a value variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Fixed-width terminal values
    Primitive,
    /// Values owning child values
    Container,
    /// Variable-width terminal values (string, timestamp)
    Advanced,
}

/// One-byte stable identifier of a value variant
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeId {
    /// Ends an object's entry sequence; never a value
    Terminator = 0,
    /// Named, insertion-ordered map
    Object = 1,
    /// Signed 8-bit integer
    Byte = 2,
    /// Boolean
    Boolean = 3,
    /// Signed 16-bit integer
    Short = 4,
    /// Signed 32-bit integer
    Int = 5,
    /// Signed 64-bit integer
    Long = 6,
    /// IEEE-754 single
    Float = 7,
    /// IEEE-754 double
    Double = 8,
    /// Length-prefixed string
    String = 9,
    /// Partially populated calendar value
    Timestamp = 10,
    /// Homogeneous sequence of named values
    List = 11,
    /// Homogeneous sequence of anonymous primitives
    Array = 12,
}

impl TypeId {
    /// Every id that names a value (terminator excluded)
    pub const VALUES: [TypeId; 12] = [
        TypeId::Object,
        TypeId::Byte,
        TypeId::Boolean,
        TypeId::Short,
        TypeId::Int,
        TypeId::Long,
        TypeId::Float,
        TypeId::Double,
        TypeId::String,
        TypeId::Timestamp,
        TypeId::List,
        TypeId::Array,
    ];

    /// Wire byte
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a wire byte; `None` for bytes outside 0..=12
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(TypeId::Terminator),
            1 => Some(TypeId::Object),
            2 => Some(TypeId::Byte),
            3 => Some(TypeId::Boolean),
            4 => Some(TypeId::Short),
            5 => Some(TypeId::Int),
            6 => Some(TypeId::Long),
            7 => Some(TypeId::Float),
            8 => Some(TypeId::Double),
            9 => Some(TypeId::String),
            10 => Some(TypeId::Timestamp),
            11 => Some(TypeId::List),
            12 => Some(TypeId::Array),
            _ => None,
        }
    }

    /// Category of the variant; `None` for the terminator
    pub const fn category(self) -> Option<Category> {
        match self {
            TypeId::Terminator => None,
            TypeId::Object | TypeId::List | TypeId::Array => Some(Category::Container),
            TypeId::String | TypeId::Timestamp => Some(Category::Advanced),
            TypeId::Byte
            | TypeId::Boolean
            | TypeId::Short
            | TypeId::Int
            | TypeId::Long
            | TypeId::Float
            | TypeId::Double => Some(Category::Primitive),
        }
    }

    /// True for fixed-width variants
    pub const fn is_primitive(self) -> bool {
        matches!(self.category(), Some(Category::Primitive))
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            TypeId::Terminator => "Terminator",
            TypeId::Object => "Object",
            TypeId::Byte => "Byte",
            TypeId::Boolean => "Boolean",
            TypeId::Short => "Short",
            TypeId::Int => "Int",
            TypeId::Long => "Long",
            TypeId::Float => "Float",
            TypeId::Double => "Double",
            TypeId::String => "String",
            TypeId::Timestamp => "Timestamp",
            TypeId::List => "List",
            TypeId::Array => "Array",
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<TypeId> for u8 {
    fn from(id: TypeId) -> u8 {
        id.as_u8()
    }
}
