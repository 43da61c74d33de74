// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recorded address space served as a [`UaSession`].
//!
//! Lets the whole discovery pipeline run offline: integration tests build a
//! snapshot in code, the inspection tool loads one from JSON.
//!
//! ```json
//! {
//!   "nodes": [
//!     {
//!       "id": "ns=2;i=6001",
//!       "browse_name": { "namespace": 2, "name": "Plant" },
//!       "value": "<opc:TypeDictionary ...>",
//!       "references": [ { "reference_type": "i=47", "target": "ns=2;i=6002" } ]
//!     }
//!   ]
//! }
//! ```
//!
//! Only forward references are stored; inverse browsing scans for references
//! that point at the browsed node. Reference types match exactly (no subtype
//! expansion).

use crate::dynamic::TypeDescriptor;
use crate::node::{node_id_text, qualified_name_record, EncodingId, NodeId, QualifiedName};
use crate::session::{BrowseDirection, ReferenceDescription, UaSession};
use crate::{Error, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// One forward reference of a recorded node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotReference {
    #[serde(with = "node_id_text")]
    pub reference_type: NodeId,
    #[serde(with = "node_id_text")]
    pub target: NodeId,
}

/// A recorded node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    #[serde(with = "node_id_text")]
    pub id: NodeId,
    #[serde(with = "qualified_name_record")]
    pub browse_name: QualifiedName,
    /// `Value` attribute as text (dictionaries are ASCII XML).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<SnapshotReference>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotFile {
    nodes: Vec<SnapshotNode>,
}

#[derive(Debug)]
struct Entry {
    browse_name: QualifiedName,
    value: Option<Vec<u8>>,
}

/// In-memory session over a recorded address space.
#[derive(Debug, Default)]
pub struct SnapshotSession {
    nodes: HashMap<NodeId, Entry>,
    /// (source, reference type, target), in recording order.
    references: Vec<(NodeId, NodeId, NodeId)>,
    registrations: Mutex<Vec<(EncodingId, Arc<TypeDescriptor>)>>,
}

impl SnapshotSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON text.
    ///
    /// Every reference target must be a recorded node.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: SnapshotFile =
            serde_json::from_str(text).map_err(|e| Error::Snapshot(e.to_string()))?;

        let mut session = Self::new();
        for node in file.nodes {
            session = session.with_node(node.id.clone(), node.browse_name);
            if let Some(value) = node.value {
                session = session.with_value(node.id.clone(), value.into_bytes());
            }
            for reference in node.references {
                session = session.with_reference(
                    node.id.clone(),
                    reference.reference_type,
                    reference.target,
                );
            }
        }

        if let Some((source, _, target)) = session
            .references
            .iter()
            .find(|(_, _, target)| !session.nodes.contains_key(target))
        {
            return Err(Error::Snapshot(format!(
                "reference from {} to unrecorded node {}",
                source, target
            )));
        }
        Ok(session)
    }

    /// Load from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Record a node (replacing its browse name if already present).
    pub fn with_node(mut self, id: impl Into<NodeId>, browse_name: QualifiedName) -> Self {
        self.nodes
            .entry(id.into())
            .and_modify(|e| e.browse_name = browse_name.clone())
            .or_insert(Entry {
                browse_name,
                value: None,
            });
        self
    }

    /// Set the value of a recorded node; unknown nodes are recorded with an
    /// empty browse name.
    pub fn with_value(mut self, id: impl Into<NodeId>, value: impl Into<Vec<u8>>) -> Self {
        let id = id.into();
        let namespace = id.namespace;
        self.nodes
            .entry(id)
            .or_insert_with(|| Entry {
                browse_name: QualifiedName::new(namespace, ""),
                value: None,
            })
            .value = Some(value.into());
        self
    }

    /// Record a forward reference.
    pub fn with_reference(
        mut self,
        source: impl Into<NodeId>,
        reference_type: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        self.references
            .push((source.into(), reference_type.into(), target.into()));
        self
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Descriptors handed over through [`UaSession::register_type`], in order.
    pub fn registrations(&self) -> Vec<(EncodingId, Arc<TypeDescriptor>)> {
        self.registrations.lock().clone()
    }

    fn describe(&self, node: &NodeId) -> Result<ReferenceDescription> {
        let entry = self
            .nodes
            .get(node)
            .ok_or_else(|| Error::Snapshot(format!("unrecorded node {}", node)))?;
        Ok(ReferenceDescription::new(
            entry.browse_name.clone(),
            node.clone(),
        ))
    }
}

impl UaSession for SnapshotSession {
    async fn browse(
        &self,
        source: &NodeId,
        direction: BrowseDirection,
        reference_type: &NodeId,
    ) -> Result<Vec<ReferenceDescription>> {
        if !self.nodes.contains_key(source) {
            return Err(Error::NodeNotFound(source.to_string()));
        }
        self.references
            .iter()
            .filter(|(_, ty, _)| ty == reference_type)
            .filter_map(|(from, _, to)| match direction {
                BrowseDirection::Forward if from == source => Some(to),
                BrowseDirection::Inverse if to == source => Some(from),
                _ => None,
            })
            .map(|node| self.describe(node))
            .collect()
    }

    async fn read_value(&self, node: &NodeId) -> Result<Vec<u8>> {
        let entry = self
            .nodes
            .get(node)
            .ok_or_else(|| Error::NodeNotFound(node.to_string()))?;
        entry
            .value
            .clone()
            .ok_or_else(|| Error::Transport(format!("{} has no value attribute", node)))
    }

    fn register_type(&self, id: &EncodingId, descriptor: Arc<TypeDescriptor>) {
        self.registrations.lock().push((id.clone(), descriptor));
    }
}
