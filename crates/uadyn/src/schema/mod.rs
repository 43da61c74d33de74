// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OPC Binary schema dictionaries.
//!
//! Each namespace publishes one `TypeDictionary` document. The parser turns
//! it into [`Declaration`]s without resolving anything:
//!
//! - `EnumeratedType` becomes [`EnumDeclaration`] (literal name and `Int32` value)
//! - `StructuredType` becomes [`StructDeclaration`] (fields in wire order)
//!
//! Unsupported field types are kept as [`TypeRef::Unknown`] so the builder
//! can report them; `NoOf*` length prefixes are dropped here.

mod declaration;
mod parser;

pub use declaration::{
    Declaration, EnumDeclaration, FieldDeclaration, SchemaDocument, StructDeclaration, TypeRef,
};
pub use parser::{parse, parse_document};

use std::fmt;

/// A dictionary that cannot be read at all.
#[derive(Debug)]
pub enum SchemaError {
    /// Document bytes are not text.
    Encoding(std::str::Utf8Error),
    /// Document is not well-formed XML.
    Xml(roxmltree::Error),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding(e) => write!(f, "Schema document is not text: {}", e),
            Self::Xml(e) => write!(f, "Malformed schema document: {}", e),
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encoding(e) => Some(e),
            Self::Xml(e) => Some(e),
        }
    }
}
