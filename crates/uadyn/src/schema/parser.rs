// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OPC Binary dictionary parser (roxmltree).

use super::declaration::{
    Declaration, EnumDeclaration, FieldDeclaration, SchemaDocument, StructDeclaration, TypeRef,
};
use super::SchemaError;
use crate::config::{
    ATTR_LENGTH_FIELD, ATTR_NAME, ATTR_TARGET_NAMESPACE, ATTR_TYPE_NAME, ATTR_VALUE,
    COUNT_OF_MARKER, ENUMERATED_TYPE, ENUMERATED_VALUE, FIELD, LOCAL_TYPE_PREFIX,
    OPC_BINARY_SCHEMA_URI, STRUCTURED_TYPE, UA_TYPES_URI,
};
use crate::dynamic::{EnumLiteral, PrimitiveKind};
use roxmltree::{Document, Node};

/// Parse a dictionary as read from the server.
///
/// Dictionaries are ASCII; a UTF-8 BOM and trailing NUL padding are tolerated.
pub fn parse_document(bytes: &[u8], namespace: u16) -> Result<SchemaDocument, SchemaError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let text = std::str::from_utf8(&bytes[..end]).map_err(SchemaError::Encoding)?;
    Ok(SchemaDocument::new(namespace, parse(text)?))
}

/// Parse dictionary text into declarations: enumerations first, then
/// structures, each in document order.
pub fn parse(text: &str) -> Result<Vec<Declaration>, SchemaError> {
    let doc = Document::parse(text).map_err(SchemaError::Xml)?;
    let root = doc.root_element();
    let target_namespace = root.attribute(ATTR_TARGET_NAMESPACE);

    let mut declarations = Vec::new();

    // Pass 1: enumerations
    for node in top_level(root, ENUMERATED_TYPE) {
        if let Some(decl) = parse_enum(node) {
            declarations.push(Declaration::Enum(decl));
        }
    }

    // Pass 2: structures
    for node in top_level(root, STRUCTURED_TYPE) {
        if let Some(decl) = parse_struct(node, target_namespace) {
            declarations.push(Declaration::Struct(decl));
        }
    }

    log::debug!(
        "[schema] parsed {} declaration(s) (target namespace {:?})",
        declarations.len(),
        target_namespace
    );
    Ok(declarations)
}

fn top_level<'a, 'input: 'a>(
    root: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    root.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

fn parse_enum(node: Node<'_, '_>) -> Option<EnumDeclaration> {
    let Some(name) = node.attribute(ATTR_NAME) else {
        log::debug!("[schema] {} without {} skipped", ENUMERATED_TYPE, ATTR_NAME);
        return None;
    };

    let mut literals = Vec::new();
    for value in node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == ENUMERATED_VALUE)
    {
        let Some(literal) = value.attribute(ATTR_NAME) else {
            log::warn!("[schema] {}: literal without name dropped", name);
            continue;
        };
        match value.attribute(ATTR_VALUE).map(|v| v.trim().parse::<i32>()) {
            Some(Ok(v)) => literals.push(EnumLiteral::new(literal, v)),
            _ => log::warn!(
                "[schema] {}.{}: value {:?} is not a signed 32-bit integer, dropped",
                name,
                literal,
                value.attribute(ATTR_VALUE)
            ),
        }
    }

    Some(EnumDeclaration {
        name: name.to_string(),
        literals,
    })
}

fn parse_struct(node: Node<'_, '_>, target_namespace: Option<&str>) -> Option<StructDeclaration> {
    let Some(name) = node.attribute(ATTR_NAME) else {
        log::debug!("[schema] {} without {} skipped", STRUCTURED_TYPE, ATTR_NAME);
        return None;
    };

    let mut fields = Vec::new();
    for field in node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == FIELD)
    {
        let (Some(field_name), Some(type_name)) =
            (field.attribute(ATTR_NAME), field.attribute(ATTR_TYPE_NAME))
        else {
            log::debug!("[schema] {}: field without name or type omitted", name);
            continue;
        };
        if field_name.contains(COUNT_OF_MARKER) {
            continue;
        }
        fields.push(FieldDeclaration {
            name: field_name.to_string(),
            type_ref: classify(type_name, field, target_namespace),
            array: field.attribute(ATTR_LENGTH_FIELD).is_some(),
        });
    }

    Some(StructDeclaration {
        name: name.to_string(),
        fields,
    })
}

/// Map a `TypeName` to a primitive, a local reference or unknown.
///
/// Prefixes are resolved through the document's `xmlns` bindings; the usual
/// `opc`, `ua` and `tns` prefixes are accepted even when left unbound.
fn classify(type_name: &str, field: Node<'_, '_>, target_namespace: Option<&str>) -> TypeRef {
    let (prefix, local) = match type_name.split_once(':') {
        Some((p, l)) => (Some(p), l),
        None => (None, type_name),
    };
    let uri = field.lookup_namespace_uri(prefix);
    let bound_to = |conventional: &str, expected: &str| match uri {
        Some(u) => u == expected,
        None => prefix == Some(conventional),
    };

    if bound_to("opc", OPC_BINARY_SCHEMA_URI) {
        let primitive = match local {
            "String" => PrimitiveKind::String,
            "Boolean" => PrimitiveKind::Boolean,
            "UInt32" => PrimitiveKind::UInt32,
            "DateTime" => PrimitiveKind::DateTime,
            "Int32" => PrimitiveKind::Int32,
            _ => return TypeRef::Unknown(type_name.to_string()),
        };
        return TypeRef::Primitive(primitive);
    }
    if bound_to("ua", UA_TYPES_URI) && local == "LocalizedText" {
        return TypeRef::Primitive(PrimitiveKind::LocalizedText);
    }
    let local_prefix = prefix == Some(LOCAL_TYPE_PREFIX);
    if local_prefix || (uri.is_some() && uri == target_namespace) {
        return TypeRef::Reference(local.to_string());
    }
    TypeRef::Unknown(type_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICTIONARY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<opc:TypeDictionary
    xmlns:opc="http://opcfoundation.org/BinarySchema/"
    xmlns:ua="http://opcfoundation.org/UA/"
    xmlns:tns="urn:plant:types"
    DefaultByteOrder="LittleEndian"
    TargetNamespace="urn:plant:types">
  <opc:StructuredType Name="Batch" BaseType="ua:ExtensionObject">
    <opc:Field Name="Id" TypeName="opc:String" />
    <opc:Field Name="NoOfSteps" TypeName="opc:Int32" />
    <opc:Field Name="Steps" TypeName="tns:Step" LengthField="NoOfSteps" />
    <opc:Field Name="Mode" TypeName="tns:Mode" />
    <opc:Field Name="Blob" TypeName="opc:ByteString" />
    <opc:Field Name="Label" TypeName="ua:LocalizedText" />
  </opc:StructuredType>
  <opc:EnumeratedType Name="Mode" LengthInBits="32">
    <opc:EnumeratedValue Name="Auto" Value="0" />
    <opc:EnumeratedValue Name="Manual" Value="5" />
  </opc:EnumeratedType>
</opc:TypeDictionary>"#;

    #[test]
    fn test_enums_before_structs() {
        let decls = parse(DICTIONARY).expect("parse");
        let names: Vec<_> = decls.iter().map(Declaration::name).collect();
        assert_eq!(names, ["Mode", "Batch"]);
        assert!(decls[0].is_enum());
    }

    #[test]
    fn test_enum_literals() {
        let decls = parse(DICTIONARY).expect("parse");
        let Declaration::Enum(mode) = &decls[0] else {
            panic!("expected enum");
        };
        assert_eq!(
            mode.literals,
            vec![EnumLiteral::new("Auto", 0), EnumLiteral::new("Manual", 5)]
        );
    }

    #[test]
    fn test_field_classification() {
        let decls = parse(DICTIONARY).expect("parse");
        let Declaration::Struct(batch) = &decls[1] else {
            panic!("expected struct");
        };
        let summary: Vec<_> = batch
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_ref.clone(), f.array))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Id", TypeRef::Primitive(PrimitiveKind::String), false),
                ("Steps", TypeRef::Reference("Step".into()), true),
                ("Mode", TypeRef::Reference("Mode".into()), false),
                ("Blob", TypeRef::Unknown("opc:ByteString".into()), false),
                ("Label", TypeRef::Primitive(PrimitiveKind::LocalizedText), false),
            ]
        );
    }

    #[test]
    fn test_unbound_conventional_prefixes() {
        let text = r#"<TypeDictionary>
  <StructuredType Name="Reading">
    <Field Name="Value" TypeName="opc:Int32" />
    <Field Name="Ok" TypeName="opc:Boolean" />
    <Field Name="Unit" TypeName="tns:Unit" />
    <Field Name="Other" TypeName="xs:int" />
  </StructuredType>
</TypeDictionary>"#;
        let decls = parse(text).expect("parse");
        let Declaration::Struct(reading) = &decls[0] else {
            panic!("expected struct");
        };
        let types: Vec<_> = reading.fields.iter().map(|f| f.type_ref.clone()).collect();
        assert_eq!(
            types,
            vec![
                TypeRef::Primitive(PrimitiveKind::Int32),
                TypeRef::Primitive(PrimitiveKind::Boolean),
                TypeRef::Reference("Unit".into()),
                TypeRef::Unknown("xs:int".into()),
            ]
        );
    }

    #[test]
    fn test_custom_prefix_bound_to_target_namespace() {
        let text = r#"<opc:TypeDictionary xmlns:opc="http://opcfoundation.org/BinarySchema/"
    xmlns:p="urn:plant" TargetNamespace="urn:plant">
  <opc:StructuredType Name="Outer">
    <opc:Field Name="Inner" TypeName="p:Inner" />
  </opc:StructuredType>
</opc:TypeDictionary>"#;
        let decls = parse(text).expect("parse");
        let Declaration::Struct(outer) = &decls[0] else {
            panic!("expected struct");
        };
        assert_eq!(outer.fields[0].type_ref, TypeRef::Reference("Inner".into()));
    }

    #[test]
    fn test_bad_literal_and_field_dropped() {
        let text = r#"<TypeDictionary>
  <EnumeratedType Name="Level">
    <EnumeratedValue Name="Low" Value="1" />
    <EnumeratedValue Name="Huge" Value="99999999999" />
    <EnumeratedValue Value="3" />
  </EnumeratedType>
  <StructuredType Name="S">
    <Field TypeName="opc:Int32" />
    <Field Name="Kept" TypeName="opc:UInt32" />
  </StructuredType>
</TypeDictionary>"#;
        let decls = parse(text).expect("parse");
        let Declaration::Enum(level) = &decls[0] else {
            panic!("expected enum");
        };
        assert_eq!(level.literals, vec![EnumLiteral::new("Low", 1)]);
        let Declaration::Struct(s) = &decls[1] else {
            panic!("expected struct");
        };
        assert_eq!(s.fields.len(), 1);
        assert_eq!(s.fields[0].name, "Kept");
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            parse("<TypeDictionary><StructuredType Name=\"X\">"),
            Err(SchemaError::Xml(_))
        ));
    }

    #[test]
    fn test_parse_document_bytes() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(DICTIONARY.as_bytes());
        bytes.extend_from_slice(&[0, 0]);
        let doc = parse_document(&bytes, 2).expect("parse");
        assert_eq!(doc.namespace, 2);
        assert_eq!(doc.enums().count(), 1);
        assert_eq!(doc.structs().count(), 1);

        assert!(matches!(
            parse_document(&[0x3c, 0xff, 0xfe], 2),
            Err(SchemaError::Encoding(_))
        ));
    }
}
