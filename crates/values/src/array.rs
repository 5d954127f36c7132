//! Array container: anonymous primitives of one type
//!
//! ## Wire format
//!
//! ```text
//! element_type:   u8       (0 marks an empty array; nothing follows)
//! count:          u32 BE
//! payloads:       [element_type bytes; count]
//! ```

use crate::list::MAX_PREALLOCATED_ELEMENTS;
use crate::registry::TypeRegistry;
use crate::value::{Payload, TypedValue};
use mobf_core::{Charset, MobfError, MobfRead, MobfResult, MobfWrite, TypeId};
use std::io::{Read, Write};

/// Ordered sequence of unnamed primitive values sharing one type id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayValue {
    elements: Vec<TypedValue>,
}

impl ArrayValue {
    /// Empty array
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from primitive payloads, checking homogeneity
    pub fn from_payloads<P: Into<Payload>>(values: impl IntoIterator<Item = P>) -> MobfResult<Self> {
        let mut array = ArrayValue::new();
        for value in values {
            array.push(value)?;
        }
        Ok(array)
    }

    /// Wrap elements as-is; category and homogeneity are checked at encode time
    pub fn from_elements_unchecked(elements: Vec<TypedValue>) -> Self {
        ArrayValue { elements }
    }

    /// Append a primitive of the array's element type
    pub fn push(&mut self, value: impl Into<Payload>) -> MobfResult<()> {
        let value = TypedValue::anonymous(value);
        let found = value.type_id();
        if !found.is_primitive() {
            return Err(MobfError::NonPrimitiveElement(found));
        }
        if let Some(expected) = self.element_type() {
            if found != expected {
                return Err(MobfError::HeterogeneousElements {
                    index: self.elements.len(),
                    expected,
                    found,
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

    /// Payloads in order
    pub fn payloads(&self) -> impl Iterator<Item = &Payload> {
        self.elements.iter().map(TypedValue::payload)
    }

    fn validate(&self) -> MobfResult<Option<TypeId>> {
        let expected = match self.element_type() {
            Some(id) => id,
            None => return Ok(None),
        };
        if !expected.is_primitive() {
            return Err(MobfError::NonPrimitiveElement(expected));
        }
        for (index, element) in self.elements.iter().enumerate().skip(1) {
            let found = element.type_id();
            if found != expected {
                return Err(MobfError::HeterogeneousElements {
                    index,
                    expected,
                    found,
                });
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
            return Ok(ArrayValue::new());
        }
        let template = registry.instantiate(element_type)?;
        if !template.type_id().is_primitive() {
            return Err(MobfError::InvalidElementType {
                container: "array",
                id: element_type,
            });
        }
        let count = r.read_count()?;

        let mut elements = Vec::with_capacity(count.min(MAX_PREALLOCATED_ELEMENTS));
        for _ in 0..count {
            let mut element = template.clone();
            element.decode_nested(r, registry, charset, depth)?;
            elements.push(element);
        }
        Ok(ArrayValue { elements })
    }
}
