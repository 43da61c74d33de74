// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery pipeline: locate -> fetch dictionaries -> parse -> build.
//!
//! Every session call is awaited in turn. Any transport failure aborts the
//! pipeline before anything is handed to the session, so a caller never sees
//! a partially built registry.

use crate::config::{DiscoveryConfig, HAS_COMPONENT};
use crate::dynamic::{RegistryBuilder, TypeRegistry};
use crate::locator::locate;
use crate::node::{NodeId, QualifiedNameExt, BUILTIN_NAMESPACE};
use crate::schema::{parse_document, SchemaDocument};
use crate::session::{BrowseDirection, UaSession};
use crate::Result;

/// Discover the server's custom types and build their registry.
///
/// A server without custom types yields an empty registry, not an error.
/// When `register_with_session` is set, each descriptor is passed to
/// [`UaSession::register_type`] once the whole registry is built.
pub async fn discover_and_build_registry<S: UaSession>(
    session: &S,
    config: &DiscoveryConfig,
) -> Result<TypeRegistry> {
    config.validate()?;

    let identifiers = locate(session, config).await?;
    if identifiers.is_empty() {
        log::info!("[discovery] server publishes no custom types");
        return Ok(TypeRegistry::new());
    }

    let documents = fetch_documents(session, config).await?;
    let (registry, report) = RegistryBuilder::build_with_report(&identifiers, &documents);

    log::info!(
        "[discovery] registry built: {} type(s) from {} dictionary(ies)",
        registry.len(),
        documents.len()
    );
    if !report.is_clean() {
        log::info!(
            "[discovery] {} declaration(s) skipped, {} field(s) dropped",
            report.skipped_declarations.len(),
            report.dropped_fields.len()
        );
    }

    if config.register_with_session {
        for descriptor in registry.iter() {
            session.register_type(&descriptor.encoding_id, descriptor.clone());
        }
    }

    Ok(registry)
}

/// Read and parse every dictionary below the type-system root.
///
/// A dictionary that is not well-formed is logged and skipped; the others
/// still build.
pub async fn fetch_documents<S: UaSession>(
    session: &S,
    config: &DiscoveryConfig,
) -> Result<Vec<SchemaDocument>> {
    let dictionaries = session
        .browse(
            &config.type_system_root,
            BrowseDirection::Forward,
            &NodeId::from(HAS_COMPONENT),
        )
        .await?;

    let mut documents = Vec::with_capacity(dictionaries.len());
    for dictionary in dictionaries {
        let namespace = dictionary.target.namespace;
        if config.skip_builtin_namespace && namespace == BUILTIN_NAMESPACE {
            log::debug!("[discovery] built-in dictionary {} skipped", dictionary.target);
            continue;
        }

        let bytes = session.read_value(&dictionary.target).await?;
        match parse_document(&bytes, namespace) {
            Ok(document) => {
                log::debug!(
                    "[discovery] dictionary {} (ns={}): {} declaration(s)",
                    dictionary.browse_name.label(),
                    namespace,
                    document.declarations.len()
                );
                documents.push(document);
            }
            Err(e) => log::warn!(
                "[discovery] dictionary {} ({}) skipped: {}",
                dictionary.browse_name.label(),
                dictionary.target,
                e
            ),
        }
    }
    Ok(documents)
}
