// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value types.

pub use opcua::types::{DateTime, LocalizedText};

/// A decoded value of any supported wire shape.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    // Primitives
    Boolean(bool),
    Int32(i32),
    UInt32(u32),
    /// `None` is the null string (length `-1`), distinct from `""`.
    String(Option<String>),
    LocalizedText(LocalizedText),
    DateTime(DateTime),

    // Composites
    /// Raw value plus its literal; `literal` is `None` for values the schema
    /// does not list.
    Enum { value: i32, literal: Option<String> },
    /// Fields in declaration order.
    Struct(Vec<(String, DynamicValue)>),
    Array(Vec<DynamicValue>),
}

impl DynamicValue {
    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i32. Enums yield their raw value.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) | Self::Enum { value: v, .. } => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u32.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string (null strings yield `None`).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => v.as_deref(),
            _ => None,
        }
    }

    pub fn as_localized_text(&self) -> Option<&LocalizedText> {
        match self {
            Self::LocalizedText(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTime> {
        match self {
            Self::DateTime(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as array.
    pub fn as_array(&self) -> Option<&[DynamicValue]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get struct field.
    pub fn get_field(&self, name: &str) -> Option<&DynamicValue> {
        match self {
            Self::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Get enum literal name.
    pub fn enum_literal(&self) -> Option<&str> {
        match self {
            Self::Enum { literal, .. } => literal.as_deref(),
            _ => None,
        }
    }

    /// Short kind name for error messages and listings.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Int32(_) => "signed32",
            Self::UInt32(_) => "unsigned32",
            Self::String(_) => "string",
            Self::LocalizedText(_) => "localized-text",
            Self::DateTime(_) => "datetime",
            Self::Enum { .. } => "enum",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
        }
    }
}

// Conversion traits
impl From<bool> for DynamicValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for DynamicValue {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<u32> for DynamicValue {
    fn from(v: u32) -> Self {
        Self::UInt32(v)
    }
}

impl From<&str> for DynamicValue {
    fn from(v: &str) -> Self {
        Self::String(Some(v.to_string()))
    }
}

impl From<String> for DynamicValue {
    fn from(v: String) -> Self {
        Self::String(Some(v))
    }
}

impl From<DateTime> for DynamicValue {
    fn from(v: DateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<LocalizedText> for DynamicValue {
    fn from(v: LocalizedText) -> Self {
        Self::LocalizedText(v)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{DateTime, DynamicValue, LocalizedText};
    use chrono::SecondsFormat;
    use opcua::types::UAString;
    use serde::ser::{SerializeMap, SerializeStruct};
    use serde::{Serialize, Serializer};

    fn text_or_null(s: &UAString) -> Option<&str> {
        (!s.is_null()).then(|| s.as_ref())
    }

    struct LocalizedTextRecord<'a>(&'a LocalizedText);

    impl Serialize for LocalizedTextRecord<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut s = serializer.serialize_struct("LocalizedText", 2)?;
            s.serialize_field("locale", &text_or_null(&self.0.locale))?;
            s.serialize_field("text", &text_or_null(&self.0.text))?;
            s.end()
        }
    }

    /// RFC 3339 UTC with millisecond precision; `null` for the null date.
    fn serialize_date_time<S: Serializer>(v: &DateTime, serializer: S) -> Result<S::Ok, S::Error> {
        if v.is_null() {
            return serializer.serialize_none();
        }
        serializer.serialize_str(&v.as_chrono().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Structs become maps in wire order, known enum values their literal,
    /// and date-times RFC 3339 text.
    impl Serialize for DynamicValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Boolean(v) => serializer.serialize_bool(*v),
                Self::Int32(v) => serializer.serialize_i32(*v),
                Self::UInt32(v) => serializer.serialize_u32(*v),
                Self::String(v) => v.serialize(serializer),
                Self::LocalizedText(v) => LocalizedTextRecord(v).serialize(serializer),
                Self::DateTime(v) => serialize_date_time(v, serializer),
                Self::Enum {
                    literal: Some(literal),
                    ..
                } => serializer.serialize_str(literal),
                Self::Enum { value, .. } => serializer.serialize_i32(*value),
                Self::Struct(fields) => {
                    let mut map = serializer.serialize_map(Some(fields.len()))?;
                    for (name, value) in fields {
                        map.serialize_entry(name, value)?;
                    }
                    map.end()
                }
                Self::Array(items) => items.serialize(serializer),
            }
        }
    }
}
