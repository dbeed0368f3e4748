//! # Error types
//!
//! Every fallible operation of the crate reports one of the enums below:
//!
//! - [`DecodeErrors`]: a response could not be parsed. Record-level failures are
//!   wrapped in [`DecodeErrors::Record`] with the offset at which they surfaced.
//! - [`HeaderErrors`]: the 12-byte header violated the response invariants.
//! - [`EncodeErrors`]: a query (or a single name) could not be written.
//! - [`TransportErrors`]: sending or receiving over UDP failed (`std` / `tokio-dep`).
//!
//! All of them implement `Display` and `Error`, so they compose with `?`.
use thiserror::Error;

/// Structural violations of the DNS header (RFC 1035 §4.1.1).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderErrors {
    /// The QR bit was 0: the buffer holds a query, not a response.
    #[error("response has the header of a query (QR bit should be 1, and was 0)")]
    NotAResponse,
    /// The reserved Z field must be zero.
    #[error("the Z part of the header was not zero (was {0:#05b})")]
    ReservedBitsSet(u8),
}

/// Errors raised while decoding a DNS message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrors {
    #[error("malformed header: {0}")]
    MalformedHeader(#[from] HeaderErrors),
    #[error("record CLASS {0} not supported")]
    UnsupportedClass(u16),
    #[error("unknown record TYPE {0}")]
    UnknownRecordType(u16),
    /// A read needed `needed` bytes at `offset` but the buffer ended first.
    #[error("buffer truncated: {needed} byte(s) needed at offset {offset}")]
    TruncatedBuffer { offset: usize, needed: usize },
    #[error("invalid RDLENGTH for {record_type} record: expected {expected}, found {found}")]
    InvalidRecordLength {
        record_type: &'static str,
        expected: &'static str,
        found: u16,
    },
    /// A name needed more pointer jumps than allowed; `offset` is the last pointer read.
    #[error("compression pointer loop detected at offset {offset}")]
    PointerLoop { offset: usize },
    /// A resource record failed; `offset` is where that record starts.
    #[error("failed to decode resource record at offset {offset}: {source}")]
    Record {
        offset: usize,
        source: Box<DecodeErrors>,
    },
}

impl DecodeErrors {
    /// Returns the innermost error, skipping any [`DecodeErrors::Record`] wrapping.
    pub fn root_cause(&self) -> &DecodeErrors {
        match self {
            DecodeErrors::Record { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors raised while encoding names or queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeErrors {
    #[error("label too long (>63): {0}")]
    LabelTooLong(String),
    #[error("name is too long (more than 255 octets on the wire): {0}")]
    NameTooLong(String),
    #[error("name has an empty label: {0:?}")]
    EmptyLabel(String),
    #[error("message of {0} bytes does not fit a 16-bit length prefix")]
    MessageTooLarge(usize),
}

cfg_if::cfg_if! {
    if #[cfg(any(feature = "std", feature = "tokio-dep"))] {
        /// Errors that may occur when sending a query and receiving its response over UDP.
        #[derive(Debug, Error)]
        pub enum TransportErrors {
            #[error("the server {0} is invalid")]
            InvalidServer(String),
            #[error("query of {size} bytes exceeds the UDP message limit of {limit} bytes")]
            MessageTooLarge { size: usize, limit: usize },
            #[error(transparent)]
            Encode(#[from] EncodeErrors),
            #[error("socket error: {0}")]
            SocketIo(#[from] std::io::Error),
            #[error(transparent)]
            Decode(#[from] DecodeErrors),
            /// A configured timeout ran out (async transport).
            #[error("DNS query timed out after {0:?}")]
            Elapsed(std::time::Duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_peels_record_wrapping() {
        let err = DecodeErrors::Record {
            offset: 40,
            source: Box::new(DecodeErrors::UnknownRecordType(999)),
        };
        assert_eq!(err.root_cause(), &DecodeErrors::UnknownRecordType(999));

        let plain = DecodeErrors::UnsupportedClass(3);
        assert_eq!(plain.root_cause(), &plain);
    }

    #[test]
    fn test_error_messages_mention_offsets() {
        let err = DecodeErrors::Record {
            offset: 29,
            source: Box::new(DecodeErrors::TruncatedBuffer {
                offset: 41,
                needed: 4,
            }),
        };
        let text = err.to_string();
        assert!(text.contains("offset 29"));
        assert!(text.contains("offset 41"));
    }

    #[test]
    fn test_header_errors_convert_into_decode_errors() {
        let err: DecodeErrors = HeaderErrors::NotAResponse.into();
        assert!(matches!(
            err,
            DecodeErrors::MalformedHeader(HeaderErrors::NotAResponse)
        ));
    }
}
