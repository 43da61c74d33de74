// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Address-space identifiers: node ids, browse names, encoding ids.
//!
//! [`NodeId`] and [`QualifiedName`] are the `opcua` stack's own types, so a
//! client adapter hands browse results over without conversion. This module
//! adds the [`EncodingId`] key, browse-name helpers, and the textual serde
//! forms used by config files and snapshots:
//!
//! | Form | Example |
//! |------|---------|
//! | numeric | `i=29`, `ns=2;i=5001` |
//! | string | `ns=3;s=Line1.Pump` |
//! | guid | `ns=1;g=72962b91-fa75-4ae6-8d28-b404dc7daf63` |

pub use opcua::types::{Identifier, NodeId, QualifiedName};
use std::fmt;

/// Namespace index reserved for the built-in OPC UA types.
pub const BUILTIN_NAMESPACE: u16 = 0;

/// Hashable `(namespace, local name)` form of a [`QualifiedName`].
pub type NameKey = (u16, String);

/// Browse-name helpers.
pub trait QualifiedNameExt {
    /// Local part; `""` for a null name.
    fn local_name(&self) -> &str;

    /// True for names of the built-in namespace (index 0).
    fn is_builtin(&self) -> bool;

    /// `ns:name`, as printed in logs and listings.
    fn label(&self) -> String;

    /// Map key. Same text in two namespaces gives two keys.
    fn key(&self) -> NameKey;
}

impl QualifiedNameExt for QualifiedName {
    fn local_name(&self) -> &str {
        self.name.as_ref()
    }

    fn is_builtin(&self) -> bool {
        self.namespace_index == BUILTIN_NAMESPACE
    }

    fn label(&self) -> String {
        format!("{}:{}", self.namespace_index, self.local_name())
    }

    fn key(&self) -> NameKey {
        (self.namespace_index, self.local_name().to_string())
    }
}

/// Identifier under which a binary-encoded type is registered.
///
/// Opaque beyond equality and hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodingId(NodeId);

impl EncodingId {
    pub fn new(node: NodeId) -> Self {
        Self(node)
    }

    pub fn node_id(&self) -> &NodeId {
        &self.0
    }

    pub fn namespace(&self) -> u16 {
        self.0.namespace
    }
}

impl From<NodeId> for EncodingId {
    fn from(node: NodeId) -> Self {
        Self(node)
    }
}

impl fmt::Display for EncodingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// `#[serde(with = ...)]` adapter: node ids as their text form.
#[cfg(feature = "serde")]
pub mod node_id_text {
    use super::NodeId;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(id: &NodeId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NodeId, D::Error> {
        let text = String::deserialize(deserializer)?;
        NodeId::from_str(text.trim())
            .map_err(|_| D::Error::custom(format!("invalid node id {:?}", text)))
    }
}

/// `#[serde(with = ...)]` adapter: browse names as `{ namespace, name }`.
#[cfg(feature = "serde")]
pub mod qualified_name_record {
    use super::{QualifiedName, QualifiedNameExt};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct RecordRef<'a> {
        namespace: u16,
        name: &'a str,
    }

    #[derive(Deserialize)]
    struct Record {
        namespace: u16,
        name: String,
    }

    pub fn serialize<S: Serializer>(
        name: &QualifiedName,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        RecordRef {
            namespace: name.namespace_index,
            name: name.local_name(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<QualifiedName, D::Error> {
        let record = Record::deserialize(deserializer)?;
        Ok(QualifiedName::new(record.namespace, record.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_text_forms() {
        assert_eq!(NodeId::new(0, 29u32).to_string(), "i=29");
        assert_eq!(NodeId::new(2, 5001u32).to_string(), "ns=2;i=5001");
        assert_eq!("i=93".parse::<NodeId>().ok(), Some(NodeId::new(0, 93u32)));
        assert_eq!(
            "ns=4;s=Line1.Pump".parse::<NodeId>().ok(),
            Some(NodeId::new(4, "Line1.Pump"))
        );
        assert!("garbage".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_qualified_name_helpers() {
        let a = QualifiedName::new(2, "Color");
        let b = QualifiedName::new(3, "Color");
        assert_ne!(a.key(), b.key());
        assert_eq!(a.local_name(), "Color");
        assert_eq!(a.label(), "2:Color");
        assert!(QualifiedName::new(0, "Int32").is_builtin());
        assert!(!a.is_builtin());
    }

    #[test]
    fn test_encoding_id_wraps_node() {
        let id = EncodingId::from(NodeId::new(2, 42u32));
        assert_eq!(id.namespace(), 2);
        assert_eq!(id.to_string(), "ns=2;i=42");
        assert_eq!(id.node_id(), &NodeId::new(2, 42u32));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_text_forms() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Holder {
            #[serde(with = "node_id_text")]
            id: NodeId,
            #[serde(with = "qualified_name_record")]
            name: QualifiedName,
        }

        let holder: Holder = serde_json::from_str(
            r#"{ "id": "ns=2;i=6001", "name": { "namespace": 2, "name": "Plant" } }"#,
        )
        .expect("parse");
        assert_eq!(holder.id, NodeId::new(2, 6001u32));
        assert_eq!(holder.name.key(), (2, "Plant".to_string()));

        let json = serde_json::to_string(&holder).expect("serialize");
        assert_eq!(
            json,
            r#"{"id":"ns=2;i=6001","name":{"namespace":2,"name":"Plant"}}"#
        );

        assert!(serde_json::from_str::<Holder>(
            r#"{ "id": "nope", "name": { "namespace": 0, "name": "" } }"#
        )
        .is_err());
    }
}
