//! Object container: named, insertion-ordered children
//!
//! ## Wire format
//!
//! ```text
//! repeat {
//!     type_id:    u8       (never 0)
//!     name:       string
//!     payload:    [variant bytes]
//! }
//! terminator:     u8 = 0
//! ```

use crate::registry::TypeRegistry;
use crate::value::TypedValue;
use mobf_core::{Charset, MobfError, MobfRead, MobfResult, MobfWrite, TypeId};
use rustc_hash::FxHashMap;
use std::io::{Read, Write};
use tracing::trace;

/// Insertion-ordered map from name to [`TypedValue`]
///
/// Names are unique. Adding a value under an existing name replaces it in
/// place, keeping its original position.
#[derive(Debug, Clone, Default)]
pub struct ObjectValue {
    entries: Vec<TypedValue>,
    index: FxHashMap<String, usize>,
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl ObjectValue {
    /// Empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from named values; later duplicates replace earlier ones
    pub fn from_values(values: impl IntoIterator<Item = TypedValue>) -> MobfResult<Self> {
        let mut object = ObjectValue::new();
        for value in values {
            object.add(value)?;
        }
        Ok(object)
    }

    /// Insert a named child; returns the value it replaced
    ///
    /// Fails with `UnnamedValue` if `child` has no name.
    pub fn add(&mut self, child: TypedValue) -> MobfResult<Option<TypedValue>> {
        let name = match child.name() {
            Some(name) => name.to_string(),
            None => return Err(MobfError::UnnamedValue(child.type_id())),
        };
        match self.index.get(&name) {
            Some(&position) => Ok(Some(std::mem::replace(
                &mut self.entries[position],
                child,
            ))),
            None => {
                self.index.insert(name, self.entries.len());
                self.entries.push(child);
                Ok(None)
            }
        }
    }

    /// Remove a child by name
    pub fn remove(&mut self, name: &str) -> Option<TypedValue> {
        let position = self.index.remove(name)?;
        let removed = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Child by name
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Mutable child by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut TypedValue> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    /// True if a child named `name` exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no children
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Children in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &TypedValue> {
        self.entries.iter()
    }

    /// Mutable children in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TypedValue> {
        self.entries.iter_mut()
    }

    /// Child names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(TypedValue::name)
    }

    pub(crate) fn encode_entries<W: Write + ?Sized>(
        &mut self,
        w: &mut W,
        charset: Charset,
    ) -> MobfResult<usize> {
        let mut len = 0;
        for child in &mut self.entries {
            let name = match child.name() {
                Some(name) => name.to_string(),
                None => return Err(MobfError::UnnamedValue(child.type_id())),
            };
            len += w.write_type_id(child.type_id().as_u8())?;
            len += w.write_string(&name, charset)?;
            len += child.encode_payload(w, charset)?;
        }
        len += w.write_type_id(TypeId::Terminator.as_u8())?;
        Ok(len)
    }

    pub(crate) fn decode_entries<R: Read + ?Sized>(
        r: &mut R,
        registry: &TypeRegistry,
        charset: Charset,
        depth: usize,
    ) -> MobfResult<Self> {
        let mut object = ObjectValue::new();
        loop {
            let id = r.read_type_id()?;
            if id == TypeId::Terminator.as_u8() {
                break;
            }
            let mut child = registry.instantiate(id)?;
            let name = r.read_string(charset)?;
            trace!(target: "mobf::decode", id, name = %name, depth, "object entry");
            child.decode_nested(r, registry, charset, depth)?;
            child.set_name(name);
            object.add(child)?;
        }
        Ok(object)
    }
}
