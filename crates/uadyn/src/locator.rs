// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-identifier locator.
//!
//! Walks the server's type graph and maps each custom type's browse name to
//! the node id its binary payloads are registered under.
//!
//! ## Enumerations
//!
//! Forward `HasSubtype` from the `Enumeration` data type. Every target outside
//! namespace 0 is a custom enum.
//!
//! ## Structures
//!
//! Fixed four-layer walk from the OPC Binary type system:
//!
//! ```text
//! depth 0  TypeSystem   --HasComponent-->    Dictionary
//! depth 1  Dictionary   --HasComponent-->    Description variable
//! depth 2  Description  <--HasDescription--  Encoding object
//! depth 3  Encoding     <--HasEncoding--     DataType  (recorded)
//! ```
//!
//! ## Collisions
//!
//! The first name seen wins. Servers do not guarantee sibling order in browse
//! results, so when two branches yield the same name the surviving identifier
//! depends on that order. This is a known nondeterminism and is left as is.

use crate::config::{
    DiscoveryConfig, HAS_COMPONENT, HAS_DESCRIPTION, HAS_ENCODING, HAS_SUBTYPE, MAX_LOCATOR_DEPTH,
};
use crate::node::{EncodingId, NameKey, NodeId, QualifiedName, QualifiedNameExt};
use crate::session::{BrowseDirection, UaSession};
use crate::Result;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;

/// Ordered name -> encoding id mapping, first insertion wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentifierMap {
    entries: Vec<(QualifiedName, EncodingId)>,
    index: HashMap<NameKey, usize>,
}

impl IdentifierMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name -> id` unless `name` is already present.
    ///
    /// Returns `false` when an earlier entry kept the name.
    pub fn insert(&mut self, name: QualifiedName, id: EncodingId) -> bool {
        let key = name.key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push((name, id));
        true
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&EncodingId> {
        self.index.get(&name.key()).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.index.contains_key(&name.key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedName, &EncodingId)> {
        self.entries.iter().map(|(n, id)| (n, id))
    }
}

impl FromIterator<(QualifiedName, EncodingId)> for IdentifierMap {
    fn from_iter<I: IntoIterator<Item = (QualifiedName, EncodingId)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, id) in iter {
            map.insert(name, id);
        }
        map
    }
}

/// Locate every custom enum and structure on the server.
///
/// An empty map means the server publishes no custom types; that is not an
/// error. Any failed browse aborts the whole call.
pub async fn locate<S: UaSession>(session: &S, config: &DiscoveryConfig) -> Result<IdentifierMap> {
    let mut found = IdentifierMap::new();

    locate_enums(
        session,
        &config.enum_root,
        config.recursive_enum_subtypes,
        &mut found,
    )
    .await?;
    let enum_count = found.len();

    locate_structures(session, config.type_system_root.clone(), 0, &mut found).await?;

    log::info!(
        "[locator] {} custom enum(s), {} structure(s)",
        enum_count,
        found.len() - enum_count
    );
    if found.is_empty() {
        log::info!("[locator] server publishes no custom types");
    }
    Ok(found)
}

/// Collect custom enumerations below `root`.
///
/// Only direct subtypes are visited unless `recursive` is set.
pub async fn locate_enums<S: UaSession>(
    session: &S,
    root: &NodeId,
    recursive: bool,
    found: &mut IdentifierMap,
) -> Result<()> {
    let has_subtype = NodeId::from(HAS_SUBTYPE);
    let mut pending = vec![root.clone()];
    let mut visited: HashSet<NodeId> = HashSet::new();
    visited.insert(root.clone());

    while let Some(node) = pending.pop() {
        let references = session
            .browse(&node, BrowseDirection::Forward, &has_subtype)
            .await?;

        for reference in references {
            if recursive && visited.insert(reference.target.clone()) {
                pending.push(reference.target.clone());
            }
            if reference.browse_name.is_builtin() {
                continue;
            }
            let name = reference.browse_name;
            let label = name.label();
            if !found.insert(name, EncodingId::from(reference.target)) {
                log::debug!("[locator] enum {} already located, keeping first", label);
            }
        }
    }
    Ok(())
}

/// Direction and reference type browsed at each depth of the structure walk.
///
/// # Panics
///
/// Panics for `depth > MAX_LOCATOR_DEPTH`; the walk never recurses past it.
fn layer_relation(depth: usize) -> (BrowseDirection, NodeId) {
    match depth {
        0 | 1 => (BrowseDirection::Forward, HAS_COMPONENT.into()),
        2 => (BrowseDirection::Inverse, HAS_DESCRIPTION.into()),
        3 => (BrowseDirection::Inverse, HAS_ENCODING.into()),
        _ => panic!(
            "structure walk depth {} outside 0..={}",
            depth, MAX_LOCATOR_DEPTH
        ),
    }
}

/// Depth-first structure walk. Only depth-3 targets are recorded.
pub fn locate_structures<'a, S: UaSession>(
    session: &'a S,
    node: NodeId,
    depth: usize,
    found: &'a mut IdentifierMap,
) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
        let (direction, reference_type) = layer_relation(depth);
        let references = session.browse(&node, direction, &reference_type).await?;

        for reference in references {
            if depth < MAX_LOCATOR_DEPTH {
                locate_structures(session, reference.target, depth + 1, &mut *found).await?;
                continue;
            }
            let name = reference.browse_name;
            let label = name.label();
            if !found.insert(name, EncodingId::from(reference.target)) {
                log::debug!("[locator] type {} already located, keeping first", label);
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::TypeDescriptor;
    use crate::session::ReferenceDescription;
    use crate::Error;
    use std::sync::{Arc, Mutex};

    type Key = (NodeId, BrowseDirection, NodeId);

    #[derive(Default)]
    struct ScriptedSession {
        replies: HashMap<Key, Vec<ReferenceDescription>>,
        fail_on: Option<NodeId>,
        calls: Mutex<Vec<Key>>,
    }

    impl ScriptedSession {
        fn reply(
            mut self,
            source: NodeId,
            direction: BrowseDirection,
            reference: impl Into<NodeId>,
            targets: Vec<(QualifiedName, NodeId)>,
        ) -> Self {
            self.replies.insert(
                (source, direction, reference.into()),
                targets
                    .into_iter()
                    .map(|(n, t)| ReferenceDescription::new(n, t))
                    .collect(),
            );
            self
        }
    }

    impl UaSession for ScriptedSession {
        async fn browse(
            &self,
            source: &NodeId,
            direction: BrowseDirection,
            reference_type: &NodeId,
        ) -> Result<Vec<ReferenceDescription>> {
            let key = (source.clone(), direction, reference_type.clone());
            self.calls.lock().unwrap().push(key.clone());
            if self.fail_on.as_ref() == Some(source) {
                return Err(Error::Timeout);
            }
            Ok(self.replies.get(&key).cloned().unwrap_or_default())
        }

        async fn read_value(&self, node: &NodeId) -> Result<Vec<u8>> {
            Err(Error::NodeNotFound(node.to_string()))
        }

        fn register_type(&self, _id: &EncodingId, _descriptor: Arc<TypeDescriptor>) {}
    }

    fn qn(ns: u16, name: &str) -> QualifiedName {
        QualifiedName::new(ns, name)
    }

    fn structure_graph() -> ScriptedSession {
        let root = NodeId::new(0, 93u32);
        let dict = NodeId::new(2, 6001u32);
        let desc = NodeId::new(2, 6002u32);
        let enc = NodeId::new(2, 5002u32);
        ScriptedSession::default()
            .reply(
                root,
                BrowseDirection::Forward,
                HAS_COMPONENT,
                vec![(qn(2, "Demo"), dict.clone())],
            )
            .reply(
                dict,
                BrowseDirection::Forward,
                HAS_COMPONENT,
                vec![(qn(2, "TemperatureReading"), desc.clone())],
            )
            .reply(
                desc,
                BrowseDirection::Inverse,
                HAS_DESCRIPTION,
                vec![(qn(0, "Default Binary"), enc.clone())],
            )
            .reply(
                enc,
                BrowseDirection::Inverse,
                HAS_ENCODING,
                vec![(qn(2, "TemperatureReading"), NodeId::new(2, 42u32))],
            )
    }

    #[test]
    fn test_identifier_map_first_seen_wins() {
        let mut map = IdentifierMap::new();
        assert!(map.insert(qn(2, "A"), NodeId::new(2, 1u32).into()));
        assert!(!map.insert(qn(2, "A"), NodeId::new(2, 2u32).into()));
        assert!(map.insert(qn(3, "A"), NodeId::new(3, 1u32).into()));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&qn(2, "A")), Some(&EncodingId::from(NodeId::new(2, 1u32))));
    }

    #[test]
    fn test_layer_table() {
        let forward_component = (BrowseDirection::Forward, NodeId::from(HAS_COMPONENT));
        assert_eq!(layer_relation(0), forward_component);
        assert_eq!(layer_relation(1), forward_component);
        assert_eq!(
            layer_relation(2),
            (BrowseDirection::Inverse, NodeId::from(HAS_DESCRIPTION))
        );
        assert_eq!(
            layer_relation(3),
            (BrowseDirection::Inverse, NodeId::from(HAS_ENCODING))
        );
    }

    #[test]
    #[should_panic(expected = "outside 0..=3")]
    fn test_layer_beyond_ceiling_panics() {
        let _ = layer_relation(4);
    }

    #[tokio::test]
    async fn test_structure_walk_records_depth_three_only() {
        let session = structure_graph();
        let mut found = IdentifierMap::new();
        locate_structures(&session, NodeId::new(0, 93u32), 0, &mut found)
            .await
            .expect("walk");

        assert_eq!(found.len(), 1);
        assert_eq!(
            found.get(&qn(2, "TemperatureReading")),
            Some(&EncodingId::from(NodeId::new(2, 42u32)))
        );
        assert_eq!(session.calls.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_enum_walk_skips_builtin_namespace() {
        let session = ScriptedSession::default().reply(
            NodeId::new(0, 29u32),
            BrowseDirection::Forward,
            HAS_SUBTYPE,
            vec![
                (qn(0, "NodeClass"), NodeId::new(0, 257u32)),
                (qn(2, "Color"), NodeId::new(2, 7u32)),
                (qn(2, "Color"), NodeId::new(2, 8u32)),
            ],
        );
        let mut found = IdentifierMap::new();
        locate_enums(&session, &NodeId::new(0, 29u32), false, &mut found)
            .await
            .expect("walk");

        assert_eq!(found.len(), 1);
        assert_eq!(found.get(&qn(2, "Color")), Some(&EncodingId::from(NodeId::new(2, 7u32))));
        assert_eq!(session.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_recursive_enum_walk() {
        let session = ScriptedSession::default()
            .reply(
                NodeId::new(0, 29u32),
                BrowseDirection::Forward,
                HAS_SUBTYPE,
                vec![(qn(2, "Base"), NodeId::new(2, 10u32))],
            )
            .reply(
                NodeId::new(2, 10u32),
                BrowseDirection::Forward,
                HAS_SUBTYPE,
                vec![(qn(2, "Derived"), NodeId::new(2, 11u32))],
            );

        let mut flat = IdentifierMap::new();
        locate_enums(&session, &NodeId::new(0, 29u32), false, &mut flat)
            .await
            .expect("flat");
        assert_eq!(flat.len(), 1);

        let mut deep = IdentifierMap::new();
        locate_enums(&session, &NodeId::new(0, 29u32), true, &mut deep)
            .await
            .expect("deep");
        assert!(deep.contains(&qn(2, "Derived")));
    }

    #[tokio::test]
    async fn test_locate_empty_server() {
        let session = ScriptedSession::default();
        let found = locate(&session, &DiscoveryConfig::default())
            .await
            .expect("locate");
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_browse_failure_aborts() {
        let mut session = structure_graph();
        session.fail_on = Some(NodeId::new(2, 6002u32));
        let result = locate(&session, &DiscoveryConfig::default()).await;
        assert!(matches!(result, Err(Error::Timeout)));
    }
}
