//! Decoding of DNS responses.
//!
//! The decoder is a single forward pass over the message: header, questions, then
//! the answer, authority and additional records in the order announced by the
//! header counts. The first structural violation aborts the decode; a partially
//! filled [`Response`] is never returned.
use crate::dns::errors::{DecodeErrors, HeaderErrors};
use crate::dns::reader::MessageReader;
use crate::dns::resolver::record::Record;
use crate::dns::resolver::types::{
    HeaderFlags, OpCodeOptions, Question, RecordClass, RecordType, ResponseCode,
};
use std::collections::HashMap;
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A decoded DNS response.
///
/// Only [`Response::decode`] creates one; the sections are exposed read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Response {
    id: u16,
    flags: HeaderFlags,
    response_code: ResponseCode,
    questions: Vec<Question>,
    // RRs answering the question
    answers: Vec<Record>,
    // RRs pointing toward an authority
    authority: Vec<Record>,
    // RRs holding additional information
    additional: Vec<Record>,
}

impl Response {
    /// Parses a complete response message.
    ///
    /// # Errors
    /// - [`DecodeErrors::MalformedHeader`] if QR is not set or Z is not zero.
    /// - [`DecodeErrors::UnsupportedClass`] / [`DecodeErrors::UnknownRecordType`] for a
    ///   question outside class IN or with an unknown QTYPE.
    /// - [`DecodeErrors::Record`] wrapping whatever made a resource record fail, with
    ///   the offset at which that record starts.
    /// - [`DecodeErrors::TruncatedBuffer`] if the buffer ends early.
    pub fn decode(buf: &[u8]) -> Result<Response, DecodeErrors> {
        let mut reader = MessageReader::new(buf);

        let id = reader.read_u16()?;
        let flags = HeaderFlags::from_u16(reader.read_u16()?);

        if !flags.qr {
            return Err(HeaderErrors::NotAResponse.into());
        }
        if flags.z != 0 {
            return Err(HeaderErrors::ReservedBitsSet(flags.z).into());
        }

        let qd_count = reader.read_u16()?;
        let an_count = reader.read_u16()?;
        let ns_count = reader.read_u16()?;
        let ar_count = reader.read_u16()?;
        trace!(id, qd_count, an_count, ns_count, ar_count, "decoding DNS response");

        let mut questions = Vec::new();
        for _ in 0..qd_count {
            questions.push(decode_question(&mut reader)?);
        }

        let answers = decode_records(&mut reader, an_count)?;
        let authority = decode_records(&mut reader, ns_count)?;
        let additional = decode_records(&mut reader, ar_count)?;

        Ok(Response {
            id,
            flags,
            response_code: ResponseCode::from(flags.rcode),
            questions,
            answers,
            authority,
            additional,
        })
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn flags(&self) -> HeaderFlags {
        self.flags
    }

    /// `None` for the reserved opcodes.
    pub fn opcode(&self) -> Option<OpCodeOptions> {
        OpCodeOptions::from_u8(self.flags.opcode)
    }

    pub fn response_code(&self) -> ResponseCode {
        self.response_code
    }

    pub fn is_authoritative(&self) -> bool {
        self.flags.aa
    }

    pub fn is_truncated(&self) -> bool {
        self.flags.tc
    }

    pub fn is_recursion_desired(&self) -> bool {
        self.flags.rd
    }

    pub fn is_recursion_available(&self) -> bool {
        self.flags.ra
    }

    /// `true` when the server answered with RCODE 0 (no error).
    pub fn is_success(&self) -> bool {
        self.response_code == ResponseCode::NoError
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Record] {
        &self.answers
    }

    pub fn authority(&self) -> &[Record] {
        &self.authority
    }

    pub fn additional(&self) -> &[Record] {
        &self.additional
    }

    /// Groups the answer records by type, keeping their order within each type.
    pub fn records_by_type(&self) -> RecordMap {
        let mut map = RecordMap::new();
        for record in &self.answers {
            map.0
                .entry(record.record_type)
                .or_default()
                .push(record.clone());
        }
        map
    }
}

/// Shorthand for [`Response::decode`].
pub fn parse_response(buf: &[u8]) -> Result<Response, DecodeErrors> {
    Response::decode(buf)
}

fn decode_question(reader: &mut MessageReader<'_>) -> Result<Question, DecodeErrors> {
    let name = reader.read_name()?;
    let record_type = reader.read_u16()?;
    let class = reader.read_u16()?;

    RecordClass::expect_internet(class)?;

    Ok(Question {
        name,
        record_type: RecordType::try_from(record_type)?,
    })
}

fn decode_records(
    reader: &mut MessageReader<'_>,
    count: u16,
) -> Result<Vec<Record>, DecodeErrors> {
    let mut records = Vec::new();
    for _ in 0..count {
        let start = reader.position();
        match Record::decode(reader) {
            Ok(record) => records.push(record),
            Err(e) => {
                return Err(DecodeErrors::Record {
                    offset: start,
                    source: Box::new(e),
                });
            }
        }
    }
    Ok(records)
}

/// Records grouped by their type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordMap(HashMap<RecordType, Vec<Record>>);

impl RecordMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, record_type: RecordType) -> &[Record] {
        self.0.get(&record_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn types(&self) -> impl Iterator<Item = RecordType> + '_ {
        self.0.keys().copied()
    }

    /// A new map holding the records of `self` followed by those of `other`.
    pub fn merge(&self, other: &RecordMap) -> RecordMap {
        let mut merged = self.clone();
        merged.merge_into(other);
        merged
    }

    /// Appends the records of `other` to this map.
    pub fn merge_into(&mut self, other: &RecordMap) {
        for (record_type, records) in &other.0 {
            self.0
                .entry(*record_type)
                .or_default()
                .extend(records.iter().cloned());
        }
    }
}
