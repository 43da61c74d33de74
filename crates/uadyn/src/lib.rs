// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # uadyn - OPC UA custom types at runtime
//!
//! Discovers a server's custom enumerations and structures from its OPC
//! Binary type dictionaries and decodes their binary payloads, with no
//! compile-time knowledge of the types.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use uadyn::{discover_and_build_registry, DiscoveryConfig, Result, UaSession};
//!
//! async fn on_connected(session: &impl UaSession, payload: &[u8]) -> Result<()> {
//!     let registry = discover_and_build_registry(session, &DiscoveryConfig::default()).await?;
//!
//!     if let Some(reading) = registry.find("TemperatureReading") {
//!         match registry.decode(&reading.encoding_id, payload) {
//!             Ok(instance) => println!("{:?}", instance.get("Value")),
//!             Err(e) => eprintln!("{}", e),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |  UaSession (browse / read_value / register_type)                    |
//! +---------------------------------------------------------------------+
//!        |                               |
//!        v                               v
//!  locator: name -> EncodingId     schema: dictionary XML -> Declarations
//!        |                               |
//!        +---------------+---------------+
//!                        v
//!          dynamic::RegistryBuilder -> TypeRegistry
//!                        |
//!                        v
//!          dynamic::decode + codec::BinaryDecoder -> DecodedInstance
//! ```
//!
//! ## Modules Overview
//!
//! - [`discovery`] - the pipeline entry point
//! - [`locator`] - browse walks producing the identifier map
//! - [`schema`] - OPC Binary dictionary parser
//! - [`dynamic`] - descriptors, registry, builder and generic decoder
//! - [`codec`] - binary primitives
//! - [`session`] - the session trait the pipeline drives
//! - [`snapshot`] - offline session over a recorded address space

pub mod codec;
pub mod config;
pub mod discovery;
pub mod dynamic;
mod error;
pub mod locator;
pub mod node;
pub mod schema;
pub mod session;
#[cfg(feature = "snapshot")]
pub mod snapshot;

pub use config::DiscoveryConfig;
pub use discovery::discover_and_build_registry;
pub use dynamic::{DecodedInstance, DynamicValue, TypeDescriptor, TypeRegistry};
pub use error::{Error, Result};
pub use locator::IdentifierMap;
pub use node::{EncodingId, NodeId, QualifiedName, QualifiedNameExt};
pub use session::{BrowseDirection, ReferenceDescription, UaSession};
#[cfg(feature = "snapshot")]
pub use snapshot::SnapshotSession;
