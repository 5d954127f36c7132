//! Typed values and their encode/decode protocol
//!
//! A [`TypedValue`] is an optional name, a [`Payload`] and a modified flag.
//! The payload is a closed sum type; every variant knows its own wire id,
//! so encoding never consults the registry. Decoding starts from a
//! default instance produced by the registry and fills it from the stream.
//!
//! ## Modified flag
//!
//! The flag is per node. It is set by [`TypedValue::new`], by
//! [`TypedValue::set_payload`] and by every `*_mut` accessor that exposes
//! the payload, and cleared by a successful [`TypedValue::encode`] or
//! [`TypedValue::decode`]. It is not propagated: reaching a child through
//! [`TypedValue::child_mut`] or [`TypedValue::element_mut`] and mutating it
//! leaves the parent clean.

use crate::array::ArrayValue;
use crate::list::ListValue;
use crate::object::ObjectValue;
use crate::registry::TypeRegistry;
use mobf_core::{Category, Charset, MobfError, MobfRead, MobfResult, MobfWrite, Timestamp, TypeId};
use std::io::{Read, Write};

/// Deepest container nesting accepted while decoding
pub const MAX_NESTING_DEPTH: usize = 128;

/// The concrete value carried by a [`TypedValue`]
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Boolean
    Boolean(bool),
    /// Signed 8-bit integer
    Byte(i8),
    /// Signed 16-bit integer
    Short(i16),
    /// Signed 32-bit integer
    Int(i32),
    /// Signed 64-bit integer
    Long(i64),
    /// IEEE-754 single
    Float(f32),
    /// IEEE-754 double
    Double(f64),
    /// String
    String(String),
    /// Partial calendar value
    Timestamp(Timestamp),
    /// Named, insertion-ordered map
    Object(ObjectValue),
    /// Homogeneous sequence of named values
    List(ListValue),
    /// Homogeneous sequence of anonymous primitives
    Array(ArrayValue),
}

impl Payload {
    /// Default-valued payload for a wire id; `None` for the terminator
    pub fn default_for(id: TypeId) -> Option<Self> {
        let payload = match id {
            TypeId::Terminator => return None,
            TypeId::Object => Payload::Object(ObjectValue::new()),
            TypeId::Byte => Payload::Byte(0),
            TypeId::Boolean => Payload::Boolean(false),
            TypeId::Short => Payload::Short(0),
            TypeId::Int => Payload::Int(0),
            TypeId::Long => Payload::Long(0),
            TypeId::Float => Payload::Float(0.0),
            TypeId::Double => Payload::Double(0.0),
            TypeId::String => Payload::String(String::new()),
            TypeId::Timestamp => Payload::Timestamp(Timestamp::new()),
            TypeId::List => Payload::List(ListValue::new()),
            TypeId::Array => Payload::Array(ArrayValue::new()),
        };
        Some(payload)
    }

    /// Wire id of this variant
    pub fn type_id(&self) -> TypeId {
        match self {
            Payload::Boolean(_) => TypeId::Boolean,
            Payload::Byte(_) => TypeId::Byte,
            Payload::Short(_) => TypeId::Short,
            Payload::Int(_) => TypeId::Int,
            Payload::Long(_) => TypeId::Long,
            Payload::Float(_) => TypeId::Float,
            Payload::Double(_) => TypeId::Double,
            Payload::String(_) => TypeId::String,
            Payload::Timestamp(_) => TypeId::Timestamp,
            Payload::Object(_) => TypeId::Object,
            Payload::List(_) => TypeId::List,
            Payload::Array(_) => TypeId::Array,
        }
    }

    /// Category of this variant
    pub fn category(&self) -> Category {
        match self {
            Payload::Object(_) | Payload::List(_) | Payload::Array(_) => Category::Container,
            Payload::String(_) | Payload::Timestamp(_) => Category::Advanced,
            _ => Category::Primitive,
        }
    }
}

macro_rules! payload_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Payload {
                fn from(value: $ty) -> Self {
                    Payload::$variant(value)
                }
            }
        )*
    };
}

payload_from! {
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Timestamp => Timestamp,
    ObjectValue => Object,
    ListValue => List,
    ArrayValue => Array,
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::String(value.to_string())
    }
}

/// An optionally named value with a per-node modified flag
///
/// Equality compares name and payload and ignores the modified flag.
#[derive(Debug, Clone)]
pub struct TypedValue {
    name: Option<String>,
    payload: Payload,
    modified: bool,
}

impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.payload == other.payload
    }
}

impl TypedValue {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a named value; it starts out modified
    pub fn new(name: impl Into<String>, payload: impl Into<Payload>) -> Self {
        TypedValue {
            name: Some(name.into()),
            payload: payload.into(),
            modified: true,
        }
    }

    /// Create an unnamed value (document root or array element); it starts out modified
    pub fn anonymous(payload: impl Into<Payload>) -> Self {
        TypedValue {
            name: None,
            payload: payload.into(),
            modified: true,
        }
    }

    /// Default-valued, unnamed, unmodified instance of `id`
    ///
    /// This is what the registry hands to the decoder.
    pub fn default_of(id: TypeId) -> Option<Self> {
        Payload::default_for(id).map(|payload| TypedValue {
            name: None,
            payload,
            modified: false,
        })
    }

    /// Replace the name, keeping payload and flag
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Wire id
    pub fn type_id(&self) -> TypeId {
        self.payload.type_id()
    }

    /// Category
    pub fn category(&self) -> Category {
        self.payload.category()
    }

    /// True if mutated since the last successful encode or decode
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Force the modified flag on
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// Payload
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Replace the payload and mark modified
    pub fn set_payload(&mut self, payload: impl Into<Payload>) {
        self.payload = payload.into();
        self.modified = true;
    }

    /// Mutable payload; marks modified
    pub fn payload_mut(&mut self) -> &mut Payload {
        self.modified = true;
        &mut self.payload
    }

    /// Consume into the payload
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    // =========================================================================
    // Typed accessors
    // =========================================================================

    /// Boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self.payload {
            Payload::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// Byte payload
    pub fn as_byte(&self) -> Option<i8> {
        match self.payload {
            Payload::Byte(v) => Some(v),
            _ => None,
        }
    }

    /// Short payload
    pub fn as_short(&self) -> Option<i16> {
        match self.payload {
            Payload::Short(v) => Some(v),
            _ => None,
        }
    }

    /// Int payload
    pub fn as_int(&self) -> Option<i32> {
        match self.payload {
            Payload::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Long payload
    pub fn as_long(&self) -> Option<i64> {
        match self.payload {
            Payload::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Float payload
    pub fn as_float(&self) -> Option<f32> {
        match self.payload {
            Payload::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Double payload
    pub fn as_double(&self) -> Option<f64> {
        match self.payload {
            Payload::Double(v) => Some(v),
            _ => None,
        }
    }

    /// String payload
    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::String(v) => Some(v),
            _ => None,
        }
    }

    /// Timestamp payload
    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match &self.payload {
            Payload::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    /// Object payload
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match &self.payload {
            Payload::Object(v) => Some(v),
            _ => None,
        }
    }

    /// List payload
    pub fn as_list(&self) -> Option<&ListValue> {
        match &self.payload {
            Payload::List(v) => Some(v),
            _ => None,
        }
    }

    /// Array payload
    pub fn as_array(&self) -> Option<&ArrayValue> {
        match &self.payload {
            Payload::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Mutable object payload; marks this node modified
    pub fn as_object_mut(&mut self) -> Option<&mut ObjectValue> {
        match &mut self.payload {
            Payload::Object(v) => {
                self.modified = true;
                Some(v)
            }
            _ => None,
        }
    }

    /// Mutable list payload; marks this node modified
    pub fn as_list_mut(&mut self) -> Option<&mut ListValue> {
        match &mut self.payload {
            Payload::List(v) => {
                self.modified = true;
                Some(v)
            }
            _ => None,
        }
    }

    /// Mutable array payload; marks this node modified
    pub fn as_array_mut(&mut self) -> Option<&mut ArrayValue> {
        match &mut self.payload {
            Payload::Array(v) => {
                self.modified = true;
                Some(v)
            }
            _ => None,
        }
    }

    /// Object child by name, without marking this node modified
    pub fn child_mut(&mut self, name: &str) -> Option<&mut TypedValue> {
        match &mut self.payload {
            Payload::Object(v) => v.get_mut(name),
            _ => None,
        }
    }

    /// List or array element by position, without marking this node modified
    pub fn element_mut(&mut self, index: usize) -> Option<&mut TypedValue> {
        match &mut self.payload {
            Payload::List(v) => v.get_mut(index),
            Payload::Array(v) => v.get_mut(index),
            _ => None,
        }
    }

    /// Clear the modified flag on this node and every descendant
    pub fn clear_modified(&mut self) {
        self.modified = false;
        match &mut self.payload {
            Payload::Object(v) => v.iter_mut().for_each(TypedValue::clear_modified),
            Payload::List(v) => v.iter_mut().for_each(TypedValue::clear_modified),
            Payload::Array(v) => v.iter_mut().for_each(TypedValue::clear_modified),
            _ => {}
        }
    }

    // =========================================================================
    // Encode / decode
    // =========================================================================

    /// Container levels below this value; 0 for scalars and empty containers
    pub fn nesting_depth(&self) -> usize {
        let deepest = match &self.payload {
            Payload::Object(v) => v.iter().map(TypedValue::nesting_depth).max(),
            Payload::List(v) => v.iter().map(TypedValue::nesting_depth).max(),
            Payload::Array(v) => v.iter().map(TypedValue::nesting_depth).max(),
            _ => None,
        };
        deepest.map_or(0, |depth| depth + 1)
    }

    /// Write this value's payload (not its id or name); returns bytes written
    ///
    /// Trees nested deeper than [`MAX_NESTING_DEPTH`] are rejected before
    /// any byte is written. Clears the modified flag on success; leaves it
    /// untouched on failure.
    pub fn encode<W: Write + ?Sized>(&mut self, w: &mut W, charset: Charset) -> MobfResult<usize> {
        if self.nesting_depth() > MAX_NESTING_DEPTH {
            return Err(MobfError::EncodeTooDeep(MAX_NESTING_DEPTH));
        }
        self.encode_payload(w, charset)
    }

    pub(crate) fn encode_payload<W: Write + ?Sized>(
        &mut self,
        w: &mut W,
        charset: Charset,
    ) -> MobfResult<usize> {
        let len = match &mut self.payload {
            Payload::Boolean(v) => w.write_bool(*v)?,
            Payload::Byte(v) => w.write_byte(*v)?,
            Payload::Short(v) => w.write_short(*v)?,
            Payload::Int(v) => w.write_int32(*v)?,
            Payload::Long(v) => w.write_long(*v)?,
            Payload::Float(v) => w.write_float(*v)?,
            Payload::Double(v) => w.write_double(*v)?,
            Payload::String(v) => w.write_string(v, charset)?,
            Payload::Timestamp(v) => w.write_timestamp(v)?,
            Payload::Object(v) => v.encode_entries(w, charset)?,
            Payload::List(v) => v.encode_elements(w, charset)?,
            Payload::Array(v) => v.encode_elements(w, charset)?,
        };
        self.modified = false;
        Ok(len)
    }

    /// Replace this value's payload with one read from `r`
    ///
    /// The variant read is the one this value already holds, normally a
    /// default instance from [`TypeRegistry::instantiate`]. Clears the
    /// modified flag on success; on failure the value is left untouched.
    pub fn decode<R: Read + ?Sized>(
        &mut self,
        r: &mut R,
        registry: &TypeRegistry,
        charset: Charset,
    ) -> MobfResult<()> {
        self.decode_nested(r, registry, charset, 0)
    }

    pub(crate) fn decode_nested<R: Read + ?Sized>(
        &mut self,
        r: &mut R,
        registry: &TypeRegistry,
        charset: Charset,
        depth: usize,
    ) -> MobfResult<()> {
        if depth > MAX_NESTING_DEPTH {
            return Err(MobfError::NestingTooDeep(MAX_NESTING_DEPTH));
        }
        let payload = match self.payload.type_id() {
            TypeId::Boolean => Payload::Boolean(r.read_bool()?),
            TypeId::Byte => Payload::Byte(r.read_byte()?),
            TypeId::Short => Payload::Short(r.read_short()?),
            TypeId::Int => Payload::Int(r.read_int32()?),
            TypeId::Long => Payload::Long(r.read_long()?),
            TypeId::Float => Payload::Float(r.read_float()?),
            TypeId::Double => Payload::Double(r.read_double()?),
            TypeId::String => Payload::String(r.read_string(charset)?),
            TypeId::Timestamp => Payload::Timestamp(r.read_timestamp()?),
            TypeId::Object => {
                Payload::Object(ObjectValue::decode_entries(r, registry, charset, depth + 1)?)
            }
            TypeId::List => {
                Payload::List(ListValue::decode_elements(r, registry, charset, depth + 1)?)
            }
            TypeId::Array => {
                Payload::Array(ArrayValue::decode_elements(r, registry, charset, depth + 1)?)
            }
            TypeId::Terminator => unreachable!("payloads never carry the terminator id"),
        };
        self.payload = payload;
        self.modified = false;
        Ok(())
    }
}
