// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.
//!
//! Descriptors are plain data. A single interpreter
//! ([`decode`](crate::dynamic::decode)) walks them; nothing is generated.

use crate::node::EncodingId;
use std::fmt;
use std::sync::Arc;

/// Wire primitives a dictionary field can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Boolean,
    LocalizedText,
    UInt32,
    DateTime,
    Int32,
}

impl PrimitiveKind {
    /// Encoded size in bytes (None for variable-length primitives).
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Boolean => Some(1),
            Self::UInt32 | Self::Int32 => Some(4),
            Self::DateTime => Some(8),
            Self::String | Self::LocalizedText => None,
        }
    }

    /// Stable tag used when listing fields.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::LocalizedText => "localized-text",
            Self::UInt32 => "unsigned32",
            Self::DateTime => "datetime",
            Self::Int32 => "signed32",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Element type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Built-in wire primitive.
    Primitive(PrimitiveKind),
    /// Another discovered type (enum or structure).
    Reference(Arc<TypeDescriptor>),
}

/// Introspection tag of a field: its element type and array-ness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireTag {
    Primitive(PrimitiveKind),
    ArrayOfPrimitive(PrimitiveKind),
    Reference,
    ArrayOfReference,
}

impl fmt::Display for WireTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{}", p),
            Self::ArrayOfPrimitive(p) => write!(f, "array-of-{}", p),
            Self::Reference => f.write_str("reference-to-type"),
            Self::ArrayOfReference => f.write_str("array-of-reference-to-type"),
        }
    }
}

/// Field descriptor for structure members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Element type.
    pub field_type: FieldType,
    /// Encoded as an `Int32` length followed by that many elements.
    pub array: bool,
}

impl FieldDescriptor {
    /// Create a scalar field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            array: false,
        }
    }

    /// Mark as array.
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    pub fn wire_tag(&self) -> WireTag {
        match (&self.field_type, self.array) {
            (FieldType::Primitive(p), false) => WireTag::Primitive(*p),
            (FieldType::Primitive(p), true) => WireTag::ArrayOfPrimitive(*p),
            (FieldType::Reference(_), false) => WireTag::Reference,
            (FieldType::Reference(_), true) => WireTag::ArrayOfReference,
        }
    }

    /// Target descriptor of a reference field.
    pub fn target(&self) -> Option<&Arc<TypeDescriptor>> {
        match &self.field_type {
            FieldType::Reference(t) => Some(t),
            FieldType::Primitive(_) => None,
        }
    }

    fn type_label(&self) -> String {
        let element = match &self.field_type {
            FieldType::Primitive(p) => p.tag().to_string(),
            FieldType::Reference(t) => t.name.clone(),
        };
        if self.array {
            format!("{}[]", element)
        } else {
            element
        }
    }
}

/// Enumeration literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumLiteral {
    pub name: String,
    pub value: i32,
}

impl EnumLiteral {
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Enumeration type descriptor.
///
/// Literal names are unique; values need not be contiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumDescriptor {
    literals: Vec<EnumLiteral>,
}

impl EnumDescriptor {
    /// Create from literals, dropping any repeated name (first kept).
    pub fn new(literals: impl IntoIterator<Item = EnumLiteral>) -> Self {
        let mut desc = Self::default();
        for literal in literals {
            desc.push(literal);
        }
        desc
    }

    /// Append a literal. Returns `false` if the name already exists.
    pub fn push(&mut self, literal: EnumLiteral) -> bool {
        if self.literal(&literal.name).is_some() {
            return false;
        }
        self.literals.push(literal);
        true
    }

    pub fn literals(&self) -> &[EnumLiteral] {
        &self.literals
    }

    /// Get literal by name.
    pub fn literal(&self, name: &str) -> Option<&EnumLiteral> {
        self.literals.iter().find(|l| l.name == name)
    }

    /// Get literal by value. Several names may share one value; the first wins.
    pub fn literal_by_value(&self, value: i32) -> Option<&EnumLiteral> {
        self.literals.iter().find(|l| l.value == value)
    }
}

/// Structure type descriptor. Field order is wire order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructDescriptor {
    fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Kind of a discovered type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Enum(EnumDescriptor),
    Struct(StructDescriptor),
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name as declared in the dictionary.
    pub name: String,
    /// Identifier the binary encoding is registered under.
    pub encoding_id: EncodingId,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, encoding_id: EncodingId, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            encoding_id,
            kind,
        }
    }

    /// Create an enum type descriptor.
    pub fn enum_type(
        name: impl Into<String>,
        encoding_id: EncodingId,
        desc: EnumDescriptor,
    ) -> Self {
        Self::new(name, encoding_id, TypeKind::Enum(desc))
    }

    /// Create a struct type descriptor.
    pub fn struct_type(
        name: impl Into<String>,
        encoding_id: EncodingId,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self::new(name, encoding_id, TypeKind::Struct(StructDescriptor::new(fields)))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum(_))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    pub fn as_struct(&self) -> Option<&StructDescriptor> {
        match &self.kind {
            TypeKind::Struct(s) => Some(s),
            TypeKind::Enum(_) => None,
        }
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        self.as_struct().map(StructDescriptor::fields)
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.as_struct()?.field(name)
    }

    /// Get literals if this is an enum.
    pub fn literals(&self) -> Option<&[EnumLiteral]> {
        match &self.kind {
            TypeKind::Enum(e) => Some(e.literals()),
            TypeKind::Struct(_) => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Enum(e) => {
                writeln!(f, "enum {} ({})", self.name, self.encoding_id)?;
                for literal in e.literals() {
                    writeln!(f, "  {} = {}", literal.value, literal.name)?;
                }
            }
            TypeKind::Struct(s) => {
                writeln!(f, "struct {} ({})", self.name, self.encoding_id)?;
                for field in s.fields() {
                    writeln!(
                        f,
                        "  {}: {} <{}>",
                        field.name,
                        field.type_label(),
                        field.wire_tag()
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;

    fn id(n: u32) -> EncodingId {
        NodeId::new(2, n).into()
    }

    #[test]
    fn test_primitive_size() {
        assert_eq!(PrimitiveKind::Boolean.size(), Some(1));
        assert_eq!(PrimitiveKind::Int32.size(), Some(4));
        assert_eq!(PrimitiveKind::DateTime.size(), Some(8));
        assert_eq!(PrimitiveKind::String.size(), None);
    }

    #[test]
    fn test_wire_tags() {
        let color = Arc::new(TypeDescriptor::enum_type(
            "Color",
            id(7),
            EnumDescriptor::default(),
        ));
        let scalar = FieldDescriptor::new("c", FieldType::Reference(color.clone()));
        let many = FieldDescriptor::new("cs", FieldType::Reference(color)).array();
        let names =
            FieldDescriptor::new("names", FieldType::Primitive(PrimitiveKind::String)).array();

        assert_eq!(scalar.wire_tag().to_string(), "reference-to-type");
        assert_eq!(many.wire_tag().to_string(), "array-of-reference-to-type");
        assert_eq!(names.wire_tag().to_string(), "array-of-string");
    }

    #[test]
    fn test_enum_descriptor() {
        let desc = EnumDescriptor::new([
            EnumLiteral::new("Red", 0),
            EnumLiteral::new("Green", 1),
            EnumLiteral::new("Blue", 40),
            EnumLiteral::new("Red", 9),
        ]);

        assert_eq!(desc.literals().len(), 3);
        assert_eq!(desc.literal("Red").map(|l| l.value), Some(0));
        assert_eq!(desc.literal_by_value(40).map(|l| l.name.as_str()), Some("Blue"));
        assert!(desc.literal_by_value(2).is_none());
    }

    #[test]
    fn test_struct_lookup() {
        let point = TypeDescriptor::struct_type(
            "Point",
            id(1),
            vec![
                FieldDescriptor::new("x", FieldType::Primitive(PrimitiveKind::Int32)),
                FieldDescriptor::new("valid", FieldType::Primitive(PrimitiveKind::Boolean)),
            ],
        );
        assert!(point.is_struct());
        assert_eq!(point.field("valid").map(|f| f.name.as_str()), Some("valid"));
        assert!(point.field("z").is_none());
        assert_eq!(point.as_struct().map(|s| s.fields().len()), Some(2));

        let color = TypeDescriptor::enum_type("Color", id(2), EnumDescriptor::default());
        assert!(color.as_struct().is_none());
        assert!(color.field("x").is_none());
    }

    #[test]
    fn test_display_listing() {
        let color = TypeDescriptor::enum_type(
            "Color",
            id(7),
            EnumDescriptor::new([EnumLiteral::new("Red", 0), EnumLiteral::new("Green", 1)]),
        );
        let text = color.to_string();
        assert!(text.starts_with("enum Color (ns=2;i=7)"));
        assert!(text.contains("  1 = Green"));

        let reading = TypeDescriptor::struct_type(
            "TemperatureReading",
            id(42),
            vec![FieldDescriptor::new("Value", FieldType::Primitive(PrimitiveKind::Int32))],
        );
        assert!(reading.to_string().contains("  Value: signed32 <signed32>"));
    }
}
