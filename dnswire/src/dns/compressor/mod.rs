//! DNS Message Compressor
//!
//! Writes domain names in their RFC 1035 wire form (length-prefixed labels ended by a
//! zero byte) and replaces repeated names with compression pointers.
//!
//! Compression is keyed on the **exact** name: a pointer is only emitted when the very
//! same name was already written earlier in the message. Suffixes are not shared on
//! encode (the decoder, on the other hand, resolves pointers into any suffix, see
//! `MessageReader`).
//!
//! # Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use dnswire::dns::compressor::MessageCompressor;
//!
//! let mut buf = Vec::new();
//! let mut seen = HashMap::new();
//!
//! MessageCompressor::compress("example.com", &mut buf, &mut seen).unwrap();
//! // The same name again becomes a 2-byte pointer to offset 0.
//! MessageCompressor::compress("example.com", &mut buf, &mut seen).unwrap();
//!
//! assert_eq!(&buf[13..], &[0xc0, 0x00]);
//! ```
//!
//! The caller owns `message` and `pointer_map`; both must be scoped to a single message.
//!
//! # References
//! - RFC1035 §4.1.4 (Domain Name Representation and Compression)
//! - <https://datatracker.ietf.org/doc/html/rfc1035>
use crate::dns::errors::EncodeErrors;
use std::collections::HashMap;

/// Largest offset a 14-bit pointer can address.
const MAX_POINTER_OFFSET: usize = 0x3FFF;
const MAX_LABEL_LEN: usize = 63;
/// Longest name on the wire, length bytes and root label included.
const MAX_NAME_LEN: usize = 255;
const POINTER_BITS: u8 = 0b1100_0000;

/// Name writer for a single outgoing message.
#[derive(Debug, Clone, Copy)]
pub struct MessageCompressor;

impl MessageCompressor {
    /// Appends `name` to `message`, as a pointer when the exact same name was already
    /// written (and recorded in `pointer_map`), as labels otherwise.
    ///
    /// The pointer takes the form of a two octet sequence:
    ///
    ///   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    ///   | 1  1|                OFFSET                   |
    ///   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    ///
    /// The OFFSET field specifies an offset from the start of the message (the first
    /// octet of the ID field in the domain header).
    ///
    /// `""` and `"."` are the root name and encode as a single zero byte. One trailing
    /// dot is accepted and ignored.
    pub fn compress(
        name: &str,
        message: &mut Vec<u8>,
        pointer_map: &mut HashMap<String, usize>,
    ) -> Result<(), EncodeErrors> {
        let name = name.strip_suffix('.').unwrap_or(name);

        // Text of n bytes takes n + 2 octets: a leading length byte and the root.
        if !name.is_empty() && name.len() + 2 > MAX_NAME_LEN {
            return Err(EncodeErrors::NameTooLong(name.to_string()));
        }

        if name.is_empty() {
            message.push(0);
            return Ok(());
        }

        if let Some(&offset) = pointer_map.get(name) {
            let pointer = u16::from_be_bytes([POINTER_BITS, 0]) | offset as u16;
            message.extend_from_slice(&pointer.to_be_bytes());
            return Ok(());
        }

        let position = message.len();
        Self::write_labels(name, message)?;

        if position <= MAX_POINTER_OFFSET {
            pointer_map.insert(name.to_string(), position);
        }
        Ok(())
    }

    /// Writes every label of `name` followed by the root label. Nothing is written
    /// when a label is invalid.
    fn write_labels(name: &str, message: &mut Vec<u8>) -> Result<(), EncodeErrors> {
        let mut encoded = Vec::with_capacity(name.len() + 2);
        for label in name.split('.') {
            if label.is_empty() {
                return Err(EncodeErrors::EmptyLabel(name.to_string()));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(EncodeErrors::LabelTooLong(label.to_string()));
            }
            encoded.push(label.len() as u8);
            encoded.extend_from_slice(label.as_bytes());
        }
        encoded.push(0);

        message.extend_from_slice(&encoded);
        Ok(())
    }
}
