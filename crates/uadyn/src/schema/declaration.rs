// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parsed schema declarations.
//!
//! Pure data with references still by name; the registry builder resolves
//! them into descriptors.

use crate::dynamic::{EnumLiteral, PrimitiveKind};
use crate::node::QualifiedName;
use std::fmt;

/// Declared type of a field, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    /// Another type of the same dictionary, by bare name.
    Reference(String),
    /// Unsupported tag, kept verbatim for reporting.
    Unknown(String),
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{}", p),
            Self::Reference(name) => write!(f, "tns:{}", name),
            Self::Unknown(tag) => write!(f, "{} (unknown)", tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub name: String,
    pub type_ref: TypeRef,
    /// Carries a `LengthField` marker.
    pub array: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDeclaration {
    pub name: String,
    /// Literals in document order; names may repeat here.
    pub literals: Vec<EnumLiteral>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDeclaration {
    pub name: String,
    pub fields: Vec<FieldDeclaration>,
}

/// One top-level dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Enum(EnumDeclaration),
    Struct(StructDeclaration),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Self::Enum(e) => &e.name,
            Self::Struct(s) => &s.name,
        }
    }

    pub fn qualified_name(&self, namespace: u16) -> QualifiedName {
        QualifiedName::new(namespace, self.name())
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }
}

/// The declarations of one namespace's dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDocument {
    pub namespace: u16,
    /// Enumerations first, then structures, each in document order.
    pub declarations: Vec<Declaration>,
}

impl SchemaDocument {
    pub fn new(namespace: u16, declarations: Vec<Declaration>) -> Self {
        Self {
            namespace,
            declarations,
        }
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDeclaration> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Enum(e) => Some(e),
            Declaration::Struct(_) => None,
        })
    }

    pub fn structs(&self) -> impl Iterator<Item = &StructDeclaration> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Struct(s) => Some(s),
            Declaration::Enum(_) => None,
        })
    }
}
