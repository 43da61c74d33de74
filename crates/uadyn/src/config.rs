// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery configuration and well-known constants.
//!
//! Every node id, reference type and schema marker the pipeline depends on
//! lives here. **Do not hardcode them elsewhere.**
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: well-known node ids (the `opcua` stack's generated
//!   id enums) and OPC Binary schema vocabulary.
//! - **Level 2 (Dynamic)**: [`DiscoveryConfig`], loadable from JSON when the
//!   `serde` feature is enabled.

use crate::node::NodeId;
use opcua::types::{DataTypeId, ObjectId, ReferenceTypeId};
#[cfg(feature = "serde")]
use crate::{Error, Result};
#[cfg(feature = "serde")]
use std::path::Path;

// =======================================================================
// Well-known nodes (namespace 0)
// =======================================================================

/// `Enumeration` data type, root of every enum type.
pub const ENUMERATION_DATA_TYPE: DataTypeId = DataTypeId::Enumeration;

/// `OPCBinarySchema_TypeSystem` object, parent of the binary dictionaries.
pub const OPC_BINARY_TYPE_SYSTEM: ObjectId = ObjectId::OPCBinarySchema_TypeSystem;

/// `HasEncoding` reference type.
pub const HAS_ENCODING: ReferenceTypeId = ReferenceTypeId::HasEncoding;

/// `HasDescription` reference type.
pub const HAS_DESCRIPTION: ReferenceTypeId = ReferenceTypeId::HasDescription;

/// `HasSubtype` reference type.
pub const HAS_SUBTYPE: ReferenceTypeId = ReferenceTypeId::HasSubtype;

/// `HasComponent` reference type.
pub const HAS_COMPONENT: ReferenceTypeId = ReferenceTypeId::HasComponent;

// =======================================================================
// OPC Binary schema vocabulary
// =======================================================================

/// Element declaring an enumeration.
pub const ENUMERATED_TYPE: &str = "EnumeratedType";
/// Child element of an enumeration declaring one literal.
pub const ENUMERATED_VALUE: &str = "EnumeratedValue";
/// Element declaring a structured type.
pub const STRUCTURED_TYPE: &str = "StructuredType";
/// Child element of a structured type declaring one field.
pub const FIELD: &str = "Field";

pub const ATTR_NAME: &str = "Name";
pub const ATTR_VALUE: &str = "Value";
pub const ATTR_TYPE_NAME: &str = "TypeName";
pub const ATTR_LENGTH_FIELD: &str = "LengthField";
pub const ATTR_TARGET_NAMESPACE: &str = "TargetNamespace";

/// Namespace URI of the OPC Binary primitives (`opc:` prefix).
pub const OPC_BINARY_SCHEMA_URI: &str = "http://opcfoundation.org/BinarySchema/";
/// Namespace URI of the standard UA types (`ua:` prefix).
pub const UA_TYPES_URI: &str = "http://opcfoundation.org/UA/";

/// Name fragment marking an array length-prefix field (`NoOfItems`).
pub const COUNT_OF_MARKER: &str = "NoOf";

/// Prefix bound to the dictionary's own namespace by convention.
pub const LOCAL_TYPE_PREFIX: &str = "tns";

/// Maximum depth of the structure walk below the type-system root.
pub const MAX_LOCATOR_DEPTH: usize = 3;

/// Maximum nesting of struct-in-struct while decoding.
///
/// Schemas cannot express recursion (forward references are dropped), so a
/// deeper descriptor can only come from a hand-built registry.
pub const MAX_DECODE_DEPTH: usize = 64;

/// Largest element count accepted for an array whose elements occupy no
/// bytes (structures without fields).
pub const MAX_ZERO_WIDTH_ARRAY_LEN: usize = 65_536;

// =======================================================================
// Runtime configuration
// =======================================================================

/// Discovery pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscoveryConfig {
    /// Root of the enumeration subtype walk.
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_enum_root", with = "crate::node::node_id_text")
    )]
    pub enum_root: NodeId,

    /// Root of the binary schema walk; its components are the dictionaries.
    #[cfg_attr(
        feature = "serde",
        serde(
            default = "default_type_system_root",
            with = "crate::node::node_id_text"
        )
    )]
    pub type_system_root: NodeId,

    /// Walk subtypes of subtypes below the enumeration root.
    #[cfg_attr(feature = "serde", serde(default))]
    pub recursive_enum_subtypes: bool,

    /// Hand finished descriptors to `UaSession::register_type`.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub register_with_session: bool,

    /// Ignore dictionaries living in namespace 0 (the standard dictionary).
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub skip_builtin_namespace: bool,
}

fn default_enum_root() -> NodeId {
    ENUMERATION_DATA_TYPE.into()
}

fn default_type_system_root() -> NodeId {
    OPC_BINARY_TYPE_SYSTEM.into()
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enum_root: default_enum_root(),
            type_system_root: default_type_system_root(),
            recursive_enum_subtypes: false,
            register_with_session: true,
            skip_builtin_namespace: true,
        }
    }
}

impl DiscoveryConfig {
    /// Validate configuration.
    pub fn validate(&self) -> std::result::Result<(), crate::Error> {
        if self.enum_root == self.type_system_root {
            return Err(crate::Error::Config(format!(
                "enum_root and type_system_root are both {}",
                self.enum_root
            )));
        }
        Ok(())
    }

    /// Load configuration from a JSON file.
    #[cfg(feature = "serde")]
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
