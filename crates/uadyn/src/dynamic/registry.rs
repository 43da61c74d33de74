// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encoding id -> descriptor registry.

use crate::codec::{DecodeError, DecodeErrorKind, UaBinaryReader};
use crate::dynamic::{decode, DecodedInstance, TypeDescriptor};
use crate::node::EncodingId;
use std::collections::HashMap;
use std::sync::Arc;

/// Descriptors discovered on one connection, in registration order.
///
/// Append-only: an id, once registered, keeps its descriptor. Read-only
/// sharing (`Arc<TypeRegistry>`) across threads needs no locking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeRegistry {
    types: Vec<Arc<TypeDescriptor>>,
    by_id: HashMap<EncodingId, usize>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its own encoding id.
    ///
    /// Returns `false` (and keeps the existing entry) if the id is taken.
    pub fn register(&mut self, descriptor: Arc<TypeDescriptor>) -> bool {
        if self.by_id.contains_key(&descriptor.encoding_id) {
            return false;
        }
        self.by_id
            .insert(descriptor.encoding_id.clone(), self.types.len());
        self.types.push(descriptor);
        true
    }

    pub fn get(&self, id: &EncodingId) -> Option<&Arc<TypeDescriptor>> {
        self.by_id.get(id).map(|&i| &self.types[i])
    }

    pub fn contains(&self, id: &EncodingId) -> bool {
        self.by_id.contains_key(id)
    }

    /// First registered type with this name, any namespace.
    pub fn find(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Type with this name whose encoding id lives in `namespace`.
    pub fn find_in(&self, namespace: u16, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.types
            .iter()
            .find(|t| t.name == name && t.encoding_id.namespace() == namespace)
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Decode a whole payload registered under `id`.
    ///
    /// Trailing bytes after the value are ignored (logged at debug).
    pub fn decode(&self, id: &EncodingId, bytes: &[u8]) -> Result<DecodedInstance, DecodeError> {
        let descriptor = self
            .get(id)
            .ok_or_else(|| DecodeError::new(DecodeErrorKind::UnknownEncoding(id.clone())))?;
        let mut reader = UaBinaryReader::new(bytes);
        let instance = decode(descriptor, &mut reader)?;
        if reader.position() < bytes.len() {
            log::debug!(
                "[registry] {} ({}): {} trailing byte(s) ignored",
                descriptor.name,
                id,
                bytes.len() - reader.position()
            );
        }
        Ok(instance)
    }
}

impl<'a> IntoIterator for &'a TypeRegistry {
    type Item = &'a Arc<TypeDescriptor>;
    type IntoIter = std::slice::Iter<'a, Arc<TypeDescriptor>>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::{EnumBuilder, StructBuilder};
    use crate::dynamic::PrimitiveKind;
    use crate::node::NodeId;

    #[test]
    fn test_append_only() {
        let mut registry = TypeRegistry::new();
        let first = Arc::new(
            EnumBuilder::new("Mode", NodeId::new(2, 10u32))
                .literal("A", 0)
                .build(),
        );
        let second = Arc::new(EnumBuilder::new("Other", NodeId::new(2, 10u32)).build());

        assert!(registry.register(first));
        assert!(!registry.register(second));
        assert_eq!(registry.len(), 1);
        let kept = registry.get(&NodeId::new(2, 10u32).into()).expect("registered");
        assert_eq!(kept.name, "Mode");
    }

    #[test]
    fn test_lookup_by_name() {
        let mut registry = TypeRegistry::new();
        registry.register(Arc::new(StructBuilder::new("Pump", NodeId::new(2, 1u32)).build()));
        registry.register(Arc::new(StructBuilder::new("Pump", NodeId::new(3, 1u32)).build()));

        assert_eq!(registry.find("Pump").map(|t| t.encoding_id.namespace()), Some(2));
        assert_eq!(
            registry.find_in(3, "Pump").map(|t| t.encoding_id.namespace()),
            Some(3)
        );
        assert!(registry.find_in(4, "Pump").is_none());
        let order: Vec<_> = registry.iter().map(|t| t.encoding_id.namespace()).collect();
        assert_eq!(order, [2, 3]);
    }

    #[test]
    fn test_decode_by_id() {
        let mut registry = TypeRegistry::new();
        registry.register(Arc::new(
            StructBuilder::new("Counter", NodeId::new(2, 5u32))
                .field("Count", PrimitiveKind::UInt32)
                .build(),
        ));

        let instance = registry
            .decode(&NodeId::new(2, 5u32).into(), &[3, 0, 0, 0, 0xaa])
            .expect("decode");
        assert_eq!(instance.get("Count").and_then(|v| v.as_u32()), Some(3));

        let err = registry
            .decode(&NodeId::new(2, 6u32).into(), &[])
            .unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::UnknownEncoding(_)));
    }
}
