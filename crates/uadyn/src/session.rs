// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Session collaborator interface.
//!
//! The discovery pipeline never opens connections itself. It drives an
//! already-connected session through the [`UaSession`] trait: browse the
//! reference graph, read node values, and hand finished descriptors back so
//! the transport can decode unsolicited messages.
//!
//! # Architecture
//!
//! ```text
//! UaSession Trait
//! +-- (client stack adapter)   live server connection
//! +-- SnapshotSession          recorded address space (feature `snapshot`)
//! ```
//!
//! Timeouts and cancellation belong to the implementation. A failed or
//! timed-out request must be returned as an error; the pipeline then aborts
//! without publishing anything.

use crate::dynamic::TypeDescriptor;
use crate::node::{EncodingId, NodeId, QualifiedName};
use crate::Result;
use std::sync::Arc;

/// Direction of a browse request relative to the source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BrowseDirection {
    /// Follow references whose source is the browsed node.
    Forward,
    /// Follow references whose target is the browsed node.
    Inverse,
}

/// One browse result: the node reached and its browse name.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDescription {
    pub browse_name: QualifiedName,
    pub target: NodeId,
}

impl ReferenceDescription {
    pub fn new(browse_name: QualifiedName, target: NodeId) -> Self {
        Self {
            browse_name,
            target,
        }
    }
}

/// Connected session used during discovery.
pub trait UaSession: Send + Sync {
    /// Browse references of `reference_type` (subtypes included) from `source`.
    ///
    /// An empty result is `Ok(vec![])`, never an error.
    fn browse(
        &self,
        source: &NodeId,
        direction: BrowseDirection,
        reference_type: &NodeId,
    ) -> impl std::future::Future<Output = Result<Vec<ReferenceDescription>>> + Send;

    /// Read the raw `Value` attribute of a variable node.
    fn read_value(
        &self,
        node: &NodeId,
    ) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    /// Make a descriptor available to the transport's own decode path.
    ///
    /// Fire-and-forget: the pipeline does not observe the outcome.
    fn register_type(&self, id: &EncodingId, descriptor: Arc<TypeDescriptor>);
}
