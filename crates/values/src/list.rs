//! List container: ordered, named, homogeneous children
//!
//! ## Wire format
//!
//! ```text
//! element_type:   u8       (0 marks an empty list; nothing follows)
//! count:          u32 BE
//! repeat count {
//!     name:       string
//!     payload:    [element_type bytes]
//! }
//! ```
//!
//! Position, not name, identifies an element. Names are still required and
//! preserved because the wire format carries them.

use crate::registry::TypeRegistry;
use crate::value::TypedValue;
use mobf_core::{Charset, MobfError, MobfRead, MobfResult, MobfWrite, TypeId};
use std::io::{Read, Write};

/// Upper bound on capacity reserved from an untrusted element count
pub(crate) const MAX_PREALLOCATED_ELEMENTS: usize = 1024;

/// Ordered sequence of named values sharing one type id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListValue {
    elements: Vec<TypedValue>,
}

impl ListValue {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from named values, checking names and homogeneity
    pub fn from_values(values: impl IntoIterator<Item = TypedValue>) -> MobfResult<Self> {
        let mut list = ListValue::new();
        for value in values {
            list.push(value)?;
        }
        Ok(list)
    }

    /// Wrap elements as-is; names and homogeneity are checked at encode time
    pub fn from_elements_unchecked(elements: Vec<TypedValue>) -> Self {
        ListValue { elements }
    }

    /// Append a named element of the list's element type
    pub fn push(&mut self, value: TypedValue) -> MobfResult<()> {
        if value.name().is_none() {
            return Err(MobfError::UnnamedValue(value.type_id()));
        }
        if let Some(expected) = self.element_type() {
            if value.type_id() != expected {
                return Err(MobfError::HeterogeneousElements {
                    index: self.elements.len(),
                    expected,
                    found: value.type_id(),
                });
            }
        }
        self.elements.push(value);
        Ok(())
    }

    /// Remove the element at `index`
    pub fn remove(&mut self, index: usize) -> Option<TypedValue> {
        if index < self.elements.len() {
            Some(self.elements.remove(index))
        } else {
            None
        }
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<&TypedValue> {
        self.elements.get(index)
    }

    /// Mutable element at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut TypedValue> {
        self.elements.get_mut(index)
    }

    /// Type id shared by the elements, taken from the first one
    pub fn element_type(&self) -> Option<TypeId> {
        self.elements.first().map(TypedValue::type_id)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if there are no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in order
    pub fn iter(&self) -> impl Iterator<Item = &TypedValue> {
        self.elements.iter()
    }

    /// Mutable elements in order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TypedValue> {
        self.elements.iter_mut()
    }

    fn validate(&self) -> MobfResult<Option<TypeId>> {
        let expected = match self.element_type() {
            Some(id) => id,
            None => return Ok(None),
        };
        for (index, element) in self.elements.iter().enumerate() {
            if element.type_id() != expected {
                return Err(MobfError::HeterogeneousElements {
                    index,
                    expected,
                    found: element.type_id(),
                });
            }
            if element.name().is_none() {
                return Err(MobfError::UnnamedValue(element.type_id()));
            }
        }
        Ok(Some(expected))
    }

    pub(crate) fn encode_elements<W: Write + ?Sized>(
        &mut self,
        w: &mut W,
        charset: Charset,
    ) -> MobfResult<usize> {
        // Validate before any byte is written
        let element_type = match self.validate()? {
            Some(id) => id,
            None => return w.write_type_id(TypeId::Terminator.as_u8()),
        };

        let mut len = w.write_type_id(element_type.as_u8())?;
        len += w.write_count(self.elements.len())?;
        for element in &mut self.elements {
            let name = element.name().unwrap_or_default().to_string();
            len += w.write_string(&name, charset)?;
            len += element.encode_payload(w, charset)?;
        }
        Ok(len)
    }

    pub(crate) fn decode_elements<R: Read + ?Sized>(
        r: &mut R,
        registry: &TypeRegistry,
        charset: Charset,
        depth: usize,
    ) -> MobfResult<Self> {
        let element_type = r.read_type_id()?;
        if element_type == TypeId::Terminator.as_u8() {
            return Ok(ListValue::new());
        }
        let template = registry.instantiate(element_type)?;
        let count = r.read_count()?;

        let mut elements = Vec::with_capacity(count.min(MAX_PREALLOCATED_ELEMENTS));
        for _ in 0..count {
            let mut element = template.clone();
            let name = r.read_string(charset)?;
            element.decode_nested(r, registry, charset, depth)?;
            element.set_name(name);
            elements.push(element);
        }
        Ok(ListValue { elements })
    }
}
