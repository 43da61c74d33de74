// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic Types for OPC UA custom data
//!
//! Runtime type information built from a server's binary dictionaries, and a
//! generic decoder that interprets it. No code is generated per type.
//!
//! # Features
//!
//! - **TypeDescriptor**: enum literal table or ordered struct fields
//! - **TypeRegistry**: encoding id -> descriptor, append-only
//! - **RegistryBuilder**: parsed dictionaries + located ids -> registry
//! - **decode**: payload bytes -> [`DecodedInstance`]
//!
//! # Example
//!
//! ```rust
//! use uadyn::codec::UaBinaryReader;
//! use uadyn::dynamic::{decode, PrimitiveKind, StructBuilder};
//! use uadyn::NodeId;
//!
//! let reading = StructBuilder::new("TemperatureReading", NodeId::new(2, 42u32))
//!     .field("Value", PrimitiveKind::Int32)
//!     .build();
//!
//! let bytes = 21i32.to_le_bytes();
//! let instance = decode(&reading, &mut UaBinaryReader::new(&bytes)).unwrap();
//! assert_eq!(instance.get("Value").and_then(|v| v.as_i32()), Some(21));
//! ```

mod builder;
mod decode;
mod instance;
mod registry;
mod type_descriptor;
mod value;

pub use builder::{
    BuildReport, DropReason, DroppedField, EnumBuilder, RegistryBuilder, StructBuilder,
};
pub use decode::decode;
pub use instance::DecodedInstance;
pub use registry::TypeRegistry;
pub use type_descriptor::{
    EnumDescriptor, EnumLiteral, FieldDescriptor, FieldType, PrimitiveKind, StructDescriptor,
    TypeDescriptor, TypeKind, WireTag,
};
pub use value::{DateTime, DynamicValue, LocalizedText};
