// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor builders.
//!
//! [`RegistryBuilder`] turns parsed dictionaries into a [`TypeRegistry`];
//! [`StructBuilder`] and [`EnumBuilder`] are the fluent API for assembling
//! descriptors by hand.
//!
//! # Resolution order
//!
//! Within a document every enumeration is built before any structure, and
//! structures are built in document order. A reference resolves against
//! types already registered in this build: same namespace first, then any
//! namespace. A structure that references one declared *later* in the same
//! document therefore loses that field. Dictionaries in the wild list
//! dependencies first, and no second pass is attempted.

use crate::dynamic::{
    EnumDescriptor, EnumLiteral, FieldDescriptor, FieldType, PrimitiveKind, TypeDescriptor,
    TypeRegistry,
};
use crate::locator::IdentifierMap;
use crate::node::{EncodingId, NameKey, QualifiedName, QualifiedNameExt};
use crate::schema::{EnumDeclaration, SchemaDocument, StructDeclaration, TypeRef};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Fluent builders
// ============================================================================

/// Builder for structure descriptors.
#[derive(Debug)]
pub struct StructBuilder {
    name: String,
    encoding_id: EncodingId,
    fields: Vec<FieldDescriptor>,
}

impl StructBuilder {
    pub fn new(name: impl Into<String>, encoding_id: impl Into<EncodingId>) -> Self {
        Self {
            name: name.into(),
            encoding_id: encoding_id.into(),
            fields: Vec::new(),
        }
    }

    /// Add a primitive field.
    pub fn field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.with_field(FieldDescriptor::new(name, FieldType::Primitive(kind)))
    }

    /// Add an array of primitives.
    pub fn array_field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.with_field(FieldDescriptor::new(name, FieldType::Primitive(kind)).array())
    }

    /// Add a field of another discovered type.
    pub fn type_field(self, name: impl Into<String>, target: Arc<TypeDescriptor>) -> Self {
        self.with_field(FieldDescriptor::new(name, FieldType::Reference(target)))
    }

    /// Add an array of another discovered type.
    pub fn array_of_type(self, name: impl Into<String>, target: Arc<TypeDescriptor>) -> Self {
        self.with_field(FieldDescriptor::new(name, FieldType::Reference(target)).array())
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::struct_type(self.name, self.encoding_id, self.fields)
    }
}

/// Builder for enumeration descriptors.
#[derive(Debug)]
pub struct EnumBuilder {
    name: String,
    encoding_id: EncodingId,
    desc: EnumDescriptor,
}

impl EnumBuilder {
    pub fn new(name: impl Into<String>, encoding_id: impl Into<EncodingId>) -> Self {
        Self {
            name: name.into(),
            encoding_id: encoding_id.into(),
            desc: EnumDescriptor::default(),
        }
    }

    /// Add a literal; a repeated name is ignored.
    pub fn literal(mut self, name: impl Into<String>, value: i32) -> Self {
        self.desc.push(EnumLiteral::new(name, value));
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::enum_type(self.name, self.encoding_id, self.desc)
    }
}

// ============================================================================
// Build report
// ============================================================================

/// Why a declared field is missing from its descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// `TypeName` is not a supported primitive or local reference.
    UnknownType(String),
    /// Referenced type was not registered (yet) in this build.
    UnresolvedReference(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(tag) => write!(f, "unsupported type {}", tag),
            Self::UnresolvedReference(name) => write!(f, "unresolved reference to {}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedField {
    pub type_name: QualifiedName,
    pub field: String,
    pub reason: DropReason,
}

/// Everything the builder absorbed instead of failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Descriptors registered.
    pub registered: usize,
    /// Declarations with no located encoding id.
    pub skipped_declarations: Vec<QualifiedName>,
    /// Fields left out of their structure.
    pub dropped_fields: Vec<DroppedField>,
    /// Enum literals dropped because their name repeats.
    pub duplicate_literals: Vec<(QualifiedName, String)>,
    /// Encoding ids claimed by more than one declaration (first kept).
    pub duplicate_ids: Vec<EncodingId>,
}

impl BuildReport {
    /// Nothing was absorbed.
    pub fn is_clean(&self) -> bool {
        self.skipped_declarations.is_empty()
            && self.dropped_fields.is_empty()
            && self.duplicate_literals.is_empty()
            && self.duplicate_ids.is_empty()
    }
}

// ============================================================================
// Registry builder
// ============================================================================

/// Builds a [`TypeRegistry`] from located identifiers and parsed documents.
///
/// Pure: performs no I/O and never fails. Documents are processed in the
/// order given.
#[derive(Debug)]
pub struct RegistryBuilder<'a> {
    identifiers: &'a IdentifierMap,
    registry: TypeRegistry,
    by_name: HashMap<NameKey, Arc<TypeDescriptor>>,
    report: BuildReport,
}

impl<'a> RegistryBuilder<'a> {
    pub fn new(identifiers: &'a IdentifierMap) -> Self {
        Self {
            identifiers,
            registry: TypeRegistry::new(),
            by_name: HashMap::new(),
            report: BuildReport::default(),
        }
    }

    /// Build a registry from all `documents`.
    pub fn build(identifiers: &IdentifierMap, documents: &[SchemaDocument]) -> TypeRegistry {
        Self::build_with_report(identifiers, documents).0
    }

    /// Like [`build`](Self::build), also returning what was skipped.
    pub fn build_with_report(
        identifiers: &IdentifierMap,
        documents: &[SchemaDocument],
    ) -> (TypeRegistry, BuildReport) {
        let mut builder = RegistryBuilder::new(identifiers);
        for document in documents {
            builder.add_document(document);
        }
        builder.finish()
    }

    /// Build every locatable declaration of one document.
    pub fn add_document(&mut self, document: &SchemaDocument) {
        let namespace = document.namespace;
        for decl in document.enums() {
            if let Some(id) = self.encoding_id(namespace, &decl.name) {
                let descriptor = self.build_enum(namespace, decl, id);
                self.register(namespace, descriptor);
            }
        }
        for decl in document.structs() {
            if let Some(id) = self.encoding_id(namespace, &decl.name) {
                let descriptor = self.build_struct(namespace, decl, id);
                self.register(namespace, descriptor);
            }
        }
    }

    pub fn finish(self) -> (TypeRegistry, BuildReport) {
        (self.registry, self.report)
    }

    fn encoding_id(&mut self, namespace: u16, name: &str) -> Option<EncodingId> {
        let qualified = QualifiedName::new(namespace, name);
        match self.identifiers.get(&qualified) {
            Some(id) => Some(id.clone()),
            None => {
                log::debug!("[builder] {} has no encoding id, skipped", qualified.label());
                self.report.skipped_declarations.push(qualified);
                None
            }
        }
    }

    fn build_enum(
        &mut self,
        namespace: u16,
        decl: &EnumDeclaration,
        id: EncodingId,
    ) -> TypeDescriptor {
        let mut desc = EnumDescriptor::default();
        for literal in &decl.literals {
            if !desc.push(literal.clone()) {
                log::warn!(
                    "[builder] {}: duplicate literal {} dropped",
                    decl.name,
                    literal.name
                );
                self.report.duplicate_literals.push((
                    QualifiedName::new(namespace, decl.name.as_str()),
                    literal.name.clone(),
                ));
            }
        }
        TypeDescriptor::enum_type(&decl.name, id, desc)
    }

    fn build_struct(
        &mut self,
        namespace: u16,
        decl: &StructDeclaration,
        id: EncodingId,
    ) -> TypeDescriptor {
        let mut builder = StructBuilder::new(&decl.name, id);
        for field in &decl.fields {
            let field_type = match &field.type_ref {
                TypeRef::Primitive(p) => Ok(FieldType::Primitive(*p)),
                TypeRef::Reference(name) => self
                    .resolve(namespace, name)
                    .map(FieldType::Reference)
                    .ok_or_else(|| DropReason::UnresolvedReference(name.clone())),
                TypeRef::Unknown(tag) => Err(DropReason::UnknownType(tag.clone())),
            };
            match field_type {
                Ok(field_type) => {
                    let mut desc = FieldDescriptor::new(&field.name, field_type);
                    desc.array = field.array;
                    builder = builder.with_field(desc);
                }
                Err(reason) => {
                    log::debug!(
                        "[builder] {}.{}: {}, field dropped",
                        decl.name,
                        field.name,
                        reason
                    );
                    self.report.dropped_fields.push(DroppedField {
                        type_name: QualifiedName::new(namespace, decl.name.as_str()),
                        field: field.name.clone(),
                        reason,
                    });
                }
            }
        }
        builder.build()
    }

    fn resolve(&self, namespace: u16, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.by_name
            .get(&(namespace, name.to_string()))
            .or_else(|| self.registry.find(name))
            .cloned()
    }

    fn register(&mut self, namespace: u16, descriptor: TypeDescriptor) {
        let descriptor = Arc::new(descriptor);
        if self.registry.register(descriptor.clone()) {
            self.by_name
                .entry((namespace, descriptor.name.clone()))
                .or_insert(descriptor);
            self.report.registered += 1;
        } else {
            log::warn!(
                "[builder] encoding id {} already registered, {} not replaced",
                descriptor.encoding_id,
                descriptor.name
            );
            self.report.duplicate_ids.push(descriptor.encoding_id.clone());
        }
    }
}
