// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OPC UA Binary primitives.
//!
//! [`BinaryDecoder`] is the seam between the generic decoder and whatever
//! owns the payload bytes. [`UaBinaryReader`] is the stock implementation
//! over a byte slice; each primitive is decoded by the `opcua` stack's own
//! [`BinaryDecodable`] impl, the reader only tracks the offset and turns
//! short input into [`DecodeErrorKind::EndOfStream`].
//!
//! # Wire Format (Part 6, little-endian, no alignment)
//!
//! | Type | Encoding |
//! |------|----------|
//! | Boolean | 1 byte |
//! | Int32 / UInt32 | 4 bytes |
//! | DateTime | Int64, 100 ns ticks since 1601-01-01 |
//! | String | Int32 length (`-1` = null) + UTF-8 bytes |
//! | LocalizedText | mask byte (`0x01` locale, `0x02` text) + present strings |
//! | Array | Int32 length (`-1` = null) + elements |

mod error;

pub use error::{DecodeError, DecodeErrorKind};

use opcua::types::{BinaryDecodable, ContextOwned, DateTime, LocalizedText, UAString};
use std::fmt;

/// Source of OPC UA Binary primitives.
pub trait BinaryDecoder {
    fn read_boolean(&mut self) -> Result<bool, DecodeError>;
    fn read_int32(&mut self) -> Result<i32, DecodeError>;
    fn read_uint32(&mut self) -> Result<u32, DecodeError>;
    /// `None` for the null string.
    fn read_string(&mut self) -> Result<Option<String>, DecodeError>;
    fn read_localized_text(&mut self) -> Result<LocalizedText, DecodeError>;
    fn read_date_time(&mut self) -> Result<DateTime, DecodeError>;
    /// Element count of the following array; `None` for the null array.
    fn read_array_length(&mut self) -> Result<Option<usize>, DecodeError>;
    /// Bytes left in the input.
    fn remaining(&self) -> usize;
}

/// Reader over a borrowed buffer.
pub struct UaBinaryReader<'a> {
    buffer: &'a [u8],
    offset: usize,
    context: ContextOwned,
}

impl<'a> UaBinaryReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            offset: 0,
            context: ContextOwned::default(),
        }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    fn ensure(&self, count: usize) -> Result<(), DecodeError> {
        if count > self.remaining() {
            return Err(DecodeErrorKind::EndOfStream {
                need: count,
                have: self.remaining(),
            }
            .into());
        }
        Ok(())
    }

    /// Decode one `T` at the current offset; nothing is consumed on failure.
    fn decode<T: BinaryDecodable>(&mut self) -> Result<T, DecodeError> {
        let buffer = self.buffer;
        let mut stream = &buffer[self.offset..];
        let value = T::decode(&mut stream, &self.context.context())
            .map_err(|e| DecodeErrorKind::Malformed(e.to_string()))?;
        self.offset = buffer.len() - stream.len();
        Ok(value)
    }

    /// Decode a fixed-size `T`, reporting short input as end of stream.
    fn decode_fixed<T: BinaryDecodable>(&mut self, size: usize) -> Result<T, DecodeError> {
        self.ensure(size)?;
        self.decode()
    }

    /// Validate the length prefix at the current offset without consuming it.
    ///
    /// `-1` is null, other negatives are invalid.
    fn peek_length(&self) -> Result<Option<usize>, DecodeError> {
        self.ensure(4)?;
        let mut stream = &self.buffer[self.offset..];
        let len = i32::decode(&mut stream, &self.context.context())
            .map_err(|e| DecodeErrorKind::Malformed(e.to_string()))?;
        match len {
            -1 => Ok(None),
            len if len < 0 => Err(DecodeErrorKind::InvalidLength(len).into()),
            len => Ok(Some(len as usize)),
        }
    }
}

impl fmt::Debug for UaBinaryReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UaBinaryReader")
            .field("len", &self.buffer.len())
            .field("offset", &self.offset)
            .finish()
    }
}

impl BinaryDecoder for UaBinaryReader<'_> {
    fn read_boolean(&mut self) -> Result<bool, DecodeError> {
        self.decode_fixed(1)
    }

    fn read_int32(&mut self) -> Result<i32, DecodeError> {
        self.decode_fixed(4)
    }

    fn read_uint32(&mut self) -> Result<u32, DecodeError> {
        self.decode_fixed(4)
    }

    fn read_string(&mut self) -> Result<Option<String>, DecodeError> {
        if let Some(len) = self.peek_length()? {
            self.ensure(4 + len)?;
        }
        let value: UAString = self.decode()?;
        Ok((!value.is_null()).then(|| value.as_ref().to_string()))
    }

    fn read_localized_text(&mut self) -> Result<LocalizedText, DecodeError> {
        self.ensure(1)?;
        self.decode()
    }

    fn read_date_time(&mut self) -> Result<DateTime, DecodeError> {
        self.decode_fixed(8)
    }

    fn read_array_length(&mut self) -> Result<Option<usize>, DecodeError> {
        let len = self.peek_length()?;
        self.offset += 4;
        Ok(len)
    }

    fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ua_string(s: &str) -> Vec<u8> {
        let mut out = (s.len() as i32).to_le_bytes().to_vec();
        out.extend_from_slice(s.as_bytes());
        out
    }

    #[test]
    fn test_read_scalars() {
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&(-5i32).to_le_bytes());
        bytes.extend_from_slice(&7u32.to_le_bytes());
        bytes.extend_from_slice(&132_000_000_000_000_000i64.to_le_bytes());

        let mut reader = UaBinaryReader::new(&bytes);
        assert!(reader.read_boolean().unwrap());
        assert_eq!(reader.read_int32().unwrap(), -5);
        assert_eq!(reader.read_uint32().unwrap(), 7);
        assert_eq!(
            reader.read_date_time().unwrap().ticks(),
            132_000_000_000_000_000
        );
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 17);
    }

    #[test]
    fn test_read_strings() {
        let mut bytes = ua_string("Pump-01");
        bytes.extend_from_slice(&(-1i32).to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());

        let mut reader = UaBinaryReader::new(&bytes);
        assert_eq!(reader.read_string().unwrap().as_deref(), Some("Pump-01"));
        assert_eq!(reader.read_string().unwrap(), None);
        assert_eq!(reader.read_string().unwrap().as_deref(), Some(""));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_localized_text() {
        let mut bytes = vec![0x03];
        bytes.extend(ua_string("en"));
        bytes.extend(ua_string("Boiler"));
        bytes.push(0x02);
        bytes.extend(ua_string("Kessel"));
        bytes.push(0x00);

        let mut reader = UaBinaryReader::new(&bytes);
        let full = reader.read_localized_text().unwrap();
        assert_eq!(full.locale.as_ref(), "en");
        assert_eq!(full.text.as_ref(), "Boiler");

        let text_only = reader.read_localized_text().unwrap();
        assert!(text_only.locale.is_null());
        assert_eq!(text_only.text.as_ref(), "Kessel");

        let empty = reader.read_localized_text().unwrap();
        assert!(empty.locale.is_null() && empty.text.is_null());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_end_of_stream() {
        let bytes = [0x01, 0x02];
        let mut reader = UaBinaryReader::new(&bytes);
        let err = reader.read_int32().unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::EndOfStream { need: 4, have: 2 });
        // Nothing consumed on failure
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn test_truncated_string_body() {
        let mut bytes = 8i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"Pump");
        let mut reader = UaBinaryReader::new(&bytes);
        assert_eq!(
            reader.read_string().unwrap_err().kind,
            DecodeErrorKind::EndOfStream { need: 12, have: 8 }
        );
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_invalid_lengths() {
        let bytes = (-2i32).to_le_bytes();
        let mut reader = UaBinaryReader::new(&bytes);
        assert_eq!(
            reader.read_array_length().unwrap_err().kind,
            DecodeErrorKind::InvalidLength(-2)
        );
        assert_eq!(
            reader.read_string().unwrap_err().kind,
            DecodeErrorKind::InvalidLength(-2)
        );
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut bytes = 2i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        let mut reader = UaBinaryReader::new(&bytes);
        assert!(matches!(
            reader.read_string().unwrap_err().kind,
            DecodeErrorKind::Malformed(_)
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_null_array_length() {
        let bytes = (-1i32).to_le_bytes();
        let mut reader = UaBinaryReader::new(&bytes);
        assert_eq!(reader.read_array_length().unwrap(), None);
        assert_eq!(reader.remaining(), 0);
    }
}
