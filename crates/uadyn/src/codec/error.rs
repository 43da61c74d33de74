// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode errors.

use crate::node::EncodingId;
use std::fmt;

/// What went wrong while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Input ended before a primitive could be read.
    EndOfStream { need: usize, have: usize },
    /// Bytes rejected by the primitive decoder (bad UTF-8, encoding limits).
    Malformed(String),
    /// Length prefix outside the accepted range: a negative other than the
    /// `-1` null marker, or too many zero-width elements.
    InvalidLength(i32),
    /// Nesting deeper than [`MAX_DECODE_DEPTH`](crate::config::MAX_DECODE_DEPTH).
    DepthExceeded,
    /// No descriptor registered under this id.
    UnknownEncoding(EncodingId),
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfStream { need, have } => {
                write!(f, "end of stream: need {} bytes, have {}", need, have)
            }
            Self::Malformed(reason) => write!(f, "malformed value: {}", reason),
            Self::InvalidLength(len) => write!(f, "invalid length prefix {}", len),
            Self::DepthExceeded => write!(f, "nesting depth exceeded"),
            Self::UnknownEncoding(id) => write!(f, "no type registered for encoding {}", id),
        }
    }
}

/// Decode failure with the field path it occurred at.
///
/// The path reads `Struct.field[index].nested`; it is empty when the failure
/// happened outside any descriptor (a bare primitive read).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub path: String,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind) -> Self {
        Self {
            path: String::new(),
            kind,
        }
    }

    /// Prepend a path segment (a field or type name, or `[index]`).
    pub fn within(mut self, segment: &str) -> Self {
        if self.path.is_empty() {
            self.path = segment.to_string();
        } else if self.path.starts_with('[') {
            self.path.insert_str(0, segment);
        } else {
            self.path = format!("{}.{}", segment, self.path);
        }
        self
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::EndOfStream { .. })
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "Decode error: {}", self.kind)
        } else {
            write!(f, "Decode error at {}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for DecodeError {}
