// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Errors surfaced by the discovery pipeline.
//!
//! Only transport failures (and configuration/snapshot problems) reach the
//! caller. Unresolvable fields and declarations without a discovered encoding
//! id are absorbed by the parser and the builder; decode failures have their
//! own type, [`DecodeError`](crate::codec::DecodeError).

use std::fmt;

/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by discovery and session operations.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Browse or read request failed on the session.
    Transport(String),
    /// Browse or read request timed out on the session.
    Timeout,
    /// Requested node does not exist in the address space.
    NodeNotFound(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Discovery configuration is invalid.
    Config(String),
    /// Recorded address space could not be loaded.
    Snapshot(String),
    /// I/O error with underlying cause.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(msg) => write!(f, "Transport error: {}", msg),
            Error::Timeout => write!(f, "Session request timed out"),
            Error::NodeNotFound(node) => write!(f, "Node not found: {}", node),
            Error::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Snapshot(msg) => write!(f, "Snapshot error: {}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl Error {
    /// True when the failure came from the session (browse/read).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Timeout | Error::NodeNotFound(_)
        )
    }
}
