// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decoded instance container.

use crate::dynamic::{DynamicValue, TypeDescriptor};
use crate::node::EncodingId;

/// The result of decoding one payload.
///
/// Owns its values and keeps only the type's name and encoding id, not the
/// descriptor or the registry it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedInstance {
    type_name: String,
    encoding_id: EncodingId,
    value: DynamicValue,
}

impl DecodedInstance {
    pub(crate) fn new(descriptor: &TypeDescriptor, value: DynamicValue) -> Self {
        Self {
            type_name: descriptor.name.clone(),
            encoding_id: descriptor.encoding_id.clone(),
            value,
        }
    }

    /// Get the type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn encoding_id(&self) -> &EncodingId {
        &self.encoding_id
    }

    /// Get the underlying value.
    pub fn value(&self) -> &DynamicValue {
        &self.value
    }

    /// Into inner value.
    pub fn into_value(self) -> DynamicValue {
        self.value
    }

    /// Get a field value by name (structs only).
    pub fn get(&self, name: &str) -> Option<&DynamicValue> {
        self.value.get_field(name)
    }

    /// Iterate over fields in wire order (empty for enums).
    pub fn fields(&self) -> impl Iterator<Item = (&str, &DynamicValue)> {
        let fields = match &self.value {
            DynamicValue::Struct(fields) => fields.as_slice(),
            _ => &[],
        };
        fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Raw value and literal of an enum instance.
    pub fn as_enum(&self) -> Option<(i32, Option<&str>)> {
        match &self.value {
            DynamicValue::Enum { value, literal } => Some((*value, literal.as_deref())),
            _ => None,
        }
    }
}
