//! Building and encoding DNS queries.
//!
//! A [`Query`] is assembled with a [`QueryBuilder`] and is immutable afterwards:
//!
//! ```rust
//! use dnswire::dns::resolver::{QueryBuilder, RecordType};
//!
//! let query = QueryBuilder::new()
//!     .recursion_desired()
//!     .add_question("Example.com ", RecordType::A)
//!     .add_question("example.com", RecordType::Mx)
//!     .build();
//!
//! assert_eq!(query.questions()[0].name, "example.com");
//!
//! let bytes = query.as_bytes().unwrap();
//! // header + first question spelled out + a pointer for the repeated name
//! assert_eq!(bytes.len(), 12 + (13 + 4) + (2 + 4));
//! ```
use crate::dns::compressor::MessageCompressor;
use crate::dns::errors::EncodeErrors;
use crate::dns::resolver::types::{HeaderFlags, HeaderSection, Question, RecordClass, RecordType};
use std::collections::HashMap;

mod internal {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Generates a random 16-bit ID for a DNS query.
    pub(crate) fn generate_id() -> u16 {
        let mut thread_rng = rand::rng();
        let mut rng = SmallRng::from_rng(&mut thread_rng);

        rng.random::<u16>()
    }
}

/// A finished query: a random id, the RD flag and the questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    id: u16,
    recursion_desired: bool,
    questions: Vec<Question>,
}

impl Query {
    /// A single-question query without recursion.
    pub fn new(domain: &str, record_type: RecordType) -> Query {
        QueryBuilder::new().add_question(domain, record_type).build()
    }

    /// A single-question query asking the server to recurse.
    pub fn with_recursion(domain: &str, record_type: RecordType) -> Query {
        QueryBuilder::new()
            .recursion_desired()
            .add_question(domain, record_type)
            .build()
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    /// The id as lower-case hex, e.g. `"1a2b"`.
    pub fn id_hex(&self) -> String {
        format!("{:x}", self.id)
    }

    pub fn is_recursion_desired(&self) -> bool {
        self.recursion_desired
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Encodes the query for a UDP datagram.
    ///
    /// Only RD may be set in the flags; the answer, authority and additional counts
    /// are zero. A name repeated across questions is written once and referenced by
    /// a compression pointer afterwards.
    pub fn as_bytes(&self) -> Result<Vec<u8>, EncodeErrors> {
        let mut message: Vec<u8> = Vec::with_capacity(64);
        let mut pointer_map: HashMap<String, usize> = HashMap::new();

        let header = HeaderSection {
            id: self.id,
            flags: HeaderFlags {
                rd: self.recursion_desired,
                ..HeaderFlags::default()
            }
            .to_u16(),
            qd_count: self.questions.len() as u16,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        };
        message.extend_from_slice(&header.to_bytes());

        for question in &self.questions {
            MessageCompressor::compress(&question.name, &mut message, &mut pointer_map)?;
            message.extend_from_slice(&question.record_type.to_bytes());
            message.extend_from_slice(&RecordClass::In.to_bytes());
        }

        Ok(message)
    }

    /// Encodes the query with the 2-byte length prefix used over TCP (RFC 1035 §4.2.2).
    pub fn as_tcp_bytes(&self) -> Result<Vec<u8>, EncodeErrors> {
        let raw = self.as_bytes()?;
        let length =
            u16::try_from(raw.len()).map_err(|_| EncodeErrors::MessageTooLarge(raw.len()))?;

        let mut message = Vec::with_capacity(raw.len() + 2);
        message.extend_from_slice(&length.to_be_bytes());
        message.extend_from_slice(&raw);
        Ok(message)
    }
}

/// Accumulates the RD flag and the questions of a [`Query`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    recursion_desired: bool,
    questions: Vec<Question>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recursion_desired(mut self) -> Self {
        self.recursion_desired = true;
        self
    }

    pub fn recursion_not_desired(mut self) -> Self {
        self.recursion_desired = false;
        self
    }

    /// Adds a question; the domain is trimmed and lower-cased.
    pub fn add_question(mut self, domain: &str, record_type: RecordType) -> Self {
        self.questions.push(Question {
            name: domain.trim().to_lowercase(),
            record_type,
        });
        self
    }

    /// Finalizes a query with a fresh random id. The builder can be reused.
    pub fn build(&self) -> Query {
        Query {
            id: internal::generate_id(),
            recursion_desired: self.recursion_desired,
            questions: self.questions.clone(),
        }
    }
}
