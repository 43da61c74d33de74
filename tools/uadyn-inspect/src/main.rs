// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! uadyn-inspect
//!
//! Runs type discovery against a recorded address space and prints what a
//! client would learn from the live server.
//!
//! # Usage
//!
//! ```bash
//! # List every discovered enum and structure
//! uadyn-inspect types --snapshot plant.json
//!
//! # Decode one payload as JSON
//! uadyn-inspect decode --snapshot plant.json --type TemperatureReading --hex "15000000"
//! ```

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uadyn::{
    discover_and_build_registry, DiscoveryConfig, NodeId, SnapshotSession, TypeDescriptor,
    TypeRegistry,
};

#[derive(Parser)]
#[command(name = "uadyn-inspect")]
#[command(about = "Discover and decode OPC UA custom types offline")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered types
    Types {
        /// Recorded address space (JSON)
        #[arg(short, long, value_name = "FILE")]
        snapshot: PathBuf,

        /// Discovery configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Decode one binary payload
    Decode {
        /// Recorded address space (JSON)
        #[arg(short, long, value_name = "FILE")]
        snapshot: PathBuf,

        /// Discovery configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Type name (`Name` or `ns:Name`) or encoding id (`ns=2;i=42`)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        type_name: String,

        /// Payload bytes as hex (whitespace ignored)
        #[arg(long, value_name = "HEX")]
        hex: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // try_init also bridges the library's `log` records
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))?;

    match cli.command {
        Commands::Types { snapshot, config } => {
            let registry = discover(&snapshot, config.as_deref()).await?;
            cmd_types(&registry);
        }
        Commands::Decode {
            snapshot,
            config,
            type_name,
            hex,
        } => {
            let registry = discover(&snapshot, config.as_deref()).await?;
            cmd_decode(&registry, &type_name, &hex)?;
        }
    }

    Ok(())
}

async fn discover(snapshot: &Path, config: Option<&Path>) -> anyhow::Result<TypeRegistry> {
    let config = match config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            DiscoveryConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => DiscoveryConfig::default(),
    };

    let session = SnapshotSession::from_file(snapshot)
        .with_context(|| format!("loading snapshot {}", snapshot.display()))?;
    info!("Snapshot loaded: {} node(s)", session.node_count());

    let registry = discover_and_build_registry(&session, &config).await?;
    info!("Discovered {} type(s)", registry.len());
    Ok(registry)
}

fn cmd_types(registry: &TypeRegistry) {
    if registry.is_empty() {
        println!("No custom types published.");
        return;
    }
    for descriptor in registry {
        println!("{}", descriptor);
    }
    let enums = registry.iter().filter(|t| t.is_enum()).count();
    println!(
        "{} type(s): {} enum(s), {} structure(s)",
        registry.len(),
        enums,
        registry.len() - enums
    );
}

fn cmd_decode(registry: &TypeRegistry, type_name: &str, hex: &str) -> anyhow::Result<()> {
    let descriptor =
        lookup(registry, type_name).ok_or_else(|| anyhow!("unknown type {}", type_name))?;

    let cleaned: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = hex::decode(&cleaned).context("payload is not valid hex")?;

    let instance = registry.decode(&descriptor.encoding_id, &bytes)?;
    let output = serde_json::json!({
        "type": instance.type_name(),
        "encoding_id": instance.encoding_id().to_string(),
        "value": instance.value(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Resolve `ns=2;i=42`, `2:Name` or a bare `Name`.
fn lookup<'a>(registry: &'a TypeRegistry, query: &str) -> Option<&'a Arc<TypeDescriptor>> {
    if let Ok(node) = query.parse::<NodeId>() {
        if let Some(descriptor) = registry.get(&node.into()) {
            return Some(descriptor);
        }
    }
    if let Some((ns, name)) = query.split_once(':') {
        if let Ok(ns) = ns.parse::<u16>() {
            return registry.find_in(ns, name);
        }
    }
    registry.find(query)
}
