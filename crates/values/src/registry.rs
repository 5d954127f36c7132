//! Type registry for decoding
//!
//! The registry reverses a one-byte wire id into "which variant to decode
//! next". It is populated through a [`TypeRegistryBuilder`] and frozen by
//! [`TypeRegistryBuilder::build`]; after that it never changes.
//!
//! Encoding never consults the registry: every value writes its own id.
//!
//! ## Usage
//!
//! ```rust
//! use mobf_core::TypeId;
//! use mobf_values::TypeRegistryBuilder;
//!
//! let mut builder = TypeRegistryBuilder::new();
//! builder.register(5, TypeId::Int)?;
//! builder.register(9, TypeId::String)?;
//! let registry = builder.build();
//!
//! let value = registry.instantiate(5)?;
//! assert_eq!(value.type_id(), TypeId::Int);
//! # Ok::<(), mobf_core::MobfError>(())
//! ```

use crate::value::TypedValue;
use mobf_core::{MobfError, MobfResult, TypeId};
use rustc_hash::FxHashMap;
use std::sync::{Arc, OnceLock};

/// Accumulates `(id, variant)` bindings before freezing them
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    bindings: FxHashMap<u8, TypeId>,
}

impl TypeRegistryBuilder {
    /// Empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id` to decode as `kind`
    ///
    /// Fails with `DuplicateRegistration` if `id` is the terminator 0, if
    /// `id` is already bound, or if `kind` is already bound to another id.
    pub fn register(&mut self, id: u8, kind: TypeId) -> MobfResult<&mut Self> {
        if id == TypeId::Terminator.as_u8() {
            return Err(MobfError::duplicate_registration(
                "id 0 is reserved for the terminator",
            ));
        }
        if kind == TypeId::Terminator {
            return Err(MobfError::duplicate_registration(
                "the terminator is not a decodable variant",
            ));
        }
        if let Some(existing) = self.bindings.get(&id) {
            return Err(MobfError::duplicate_registration(format!(
                "id {} is already bound to {}",
                id, existing
            )));
        }
        if let Some((&other, _)) = self.bindings.iter().find(|(_, &bound)| bound == kind) {
            return Err(MobfError::duplicate_registration(format!(
                "{} is already bound to id {}",
                kind, other
            )));
        }
        self.bindings.insert(id, kind);
        Ok(self)
    }

    /// Freeze into an immutable registry
    pub fn build(self) -> TypeRegistry {
        TypeRegistry {
            bindings: Arc::new(self.bindings),
        }
    }
}

/// Immutable id → variant lookup used during decode
///
/// Cloning is cheap; clones share the same bindings.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    bindings: Arc<FxHashMap<u8, TypeId>>,
}

impl TypeRegistry {
    /// Registry binding every built-in variant to its standard id
    pub fn standard() -> Self {
        static STANDARD: OnceLock<TypeRegistry> = OnceLock::new();
        STANDARD
            .get_or_init(|| {
                let mut builder = TypeRegistryBuilder::new();
                for kind in TypeId::VALUES {
                    // Standard ids are distinct and non-zero
                    if let Err(e) = builder.register(kind.as_u8(), kind) {
                        unreachable!("standard registry rejected {}: {}", kind, e);
                    }
                }
                builder.build()
            })
            .clone()
    }

    /// Variant bound to `id`
    pub fn resolve(&self, id: u8) -> Option<TypeId> {
        self.bindings.get(&id).copied()
    }

    /// Default-valued, unnamed, unmodified instance of the variant bound to `id`
    ///
    /// Fails with `UnknownTypeId` if nothing is bound.
    pub fn instantiate(&self, id: u8) -> MobfResult<TypedValue> {
        self.resolve(id)
            .and_then(TypedValue::default_of)
            .ok_or(MobfError::UnknownTypeId(id))
    }

    /// True if `id` is bound
    pub fn contains(&self, id: u8) -> bool {
        self.bindings.contains_key(&id)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound ids, sorted
    pub fn ids(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self.bindings.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
