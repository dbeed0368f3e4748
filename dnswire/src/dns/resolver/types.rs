//! Header and code tables of RFC 1035 §3.2 and §4.1.
//!
//! - [`HeaderSection`] and [`HeaderFlags`] model the 12-byte message header.
//! - [`RecordType`] lists every TYPE and QTYPE of RFC 1035.
//! - [`RecordClass`] lists the CLASS values; only [`RecordClass::In`] is accepted on decode.
//! - [`OpCodeOptions`] and [`ResponseCode`] name the OPCODE and RCODE header fields.
//! - [`Question`] is one entry of the question section.
use crate::dns::errors::DecodeErrors;
use std::fmt::Display;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The fixed 12-byte header that opens every message.
///
/// `flags` is kept packed here; [`HeaderFlags`] is its unpacked form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSection {
    pub id: u16,
    pub flags: u16,
    /// QDCOUNT
    pub qd_count: u16,
    /// ANCOUNT
    pub an_count: u16,
    /// NSCOUNT
    pub ns_count: u16,
    /// ARCOUNT
    pub ar_count: u16,
}

#[allow(clippy::wrong_self_convention)]
impl HeaderSection {
    /// Big-endian wire form, fields in header order.
    pub fn to_bytes(&self) -> [u8; 12] {
        let fields = [
            self.id,
            self.flags,
            self.qd_count,
            self.an_count,
            self.ns_count,
            self.ar_count,
        ];
        let mut bytes = [0u8; 12];
        for (chunk, field) in bytes.chunks_exact_mut(2).zip(fields) {
            chunk.copy_from_slice(&field.to_be_bytes());
        }
        bytes
    }
}

/// The unpacked second word of the header (RFC 1035 §4.1.1).
///
/// ```text
///   0  1  2  3  4  5  6  7  8  9 10 11 12 13 14 15
/// +--+-----------+--+--+--+--+--------+-----------+
/// |QR|  Opcode   |AA|TC|RD|RA|   Z    |   RCODE   |
/// +--+-----------+--+--+--+--+--------+-----------+
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeaderFlags {
    /// Set on responses.
    pub qr: bool,
    /// See [`OpCodeOptions`].
    pub opcode: u8,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    /// Reserved, zero in every valid message.
    pub z: u8,
    /// See [`ResponseCode`].
    pub rcode: u8,
}

const QR_SHIFT: u16 = 15;
const OPCODE_SHIFT: u16 = 11;
const AA_SHIFT: u16 = 10;
const TC_SHIFT: u16 = 9;
const RD_SHIFT: u16 = 8;
const RA_SHIFT: u16 = 7;
const Z_SHIFT: u16 = 4;

impl HeaderFlags {
    /// Packs the flags; fields wider than their slot are masked.
    pub fn to_u16(self) -> u16 {
        let flag = |set: bool, shift: u16| u16::from(set) << shift;

        flag(self.qr, QR_SHIFT)
            | (u16::from(self.opcode) & 0xF) << OPCODE_SHIFT
            | flag(self.aa, AA_SHIFT)
            | flag(self.tc, TC_SHIFT)
            | flag(self.rd, RD_SHIFT)
            | flag(self.ra, RA_SHIFT)
            | (u16::from(self.z) & 0x7) << Z_SHIFT
            | u16::from(self.rcode) & 0xF
    }

    pub fn from_u16(word: u16) -> Self {
        let bit = |shift: u16| word >> shift & 1 == 1;
        let field = |shift: u16, mask: u16| (word >> shift & mask) as u8;

        Self {
            qr: bit(QR_SHIFT),
            opcode: field(OPCODE_SHIFT, 0xF),
            aa: bit(AA_SHIFT),
            tc: bit(TC_SHIFT),
            rd: bit(RD_SHIFT),
            ra: bit(RA_SHIFT),
            z: field(Z_SHIFT, 0x7),
            rcode: field(0, 0xF),
        }
    }
}

// 3-15 reserved for future use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OpCodeOptions {
    StandardQuery = 0,
    InverseQuery = 1,
    ServerStatusRequest = 2,
}

impl OpCodeOptions {
    /// `None` for the reserved values 3-15.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::StandardQuery),
            1 => Some(Self::InverseQuery),
            2 => Some(Self::ServerStatusRequest),
            _ => None,
        }
    }
}

/// RCODE values of RFC 1035 §4.1.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResponseCode {
    NoError,
    /// The name server was unable to interpret the query.
    FormatError,
    ServerFailure,
    /// The domain name referenced in the query does not exist.
    NameError,
    NotImplemented,
    Refused,
    /// 6-15, reserved for future use.
    Reserved(u8),
}

impl From<u8> for ResponseCode {
    fn from(value: u8) -> Self {
        match value & 0b1111 {
            0 => Self::NoError,
            1 => Self::FormatError,
            2 => Self::ServerFailure,
            3 => Self::NameError,
            4 => Self::NotImplemented,
            5 => Self::Refused,
            other => Self::Reserved(other),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(value: ResponseCode) -> Self {
        match value {
            ResponseCode::NoError => 0,
            ResponseCode::FormatError => 1,
            ResponseCode::ServerFailure => 2,
            ResponseCode::NameError => 3,
            ResponseCode::NotImplemented => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Reserved(v) => v,
        }
    }
}

/// TYPE fields are used in resource records. QTYPEs (a superset) appear in questions.
///
/// The discriminant is the wire value:
///
/// ```rust
/// use dnswire::dns::resolver::RecordType;
///
/// assert_eq!(RecordType::Mx as u16, 15);
/// assert_eq!(RecordType::try_from(16), Ok(RecordType::Txt));
/// assert_eq!("cname".parse::<RecordType>(), Ok(RecordType::Cname));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    // A host address
    A = 1,
    // An authoritative name server
    Ns = 2,
    // A mail destination (Obsolete - use MX)
    Md = 3,
    // A mail forwarder (Obsolete - use MX)
    Mf = 4,
    // The canonical name for an alias
    Cname = 5,
    // Marks the start of a zone of authority
    Soa = 6,
    // A mailbox domain name (EXPERIMENTAL)
    Mb = 7,
    // A mail group member (EXPERIMENTAL)
    Mg = 8,
    // A mail rename domain name (EXPERIMENTAL)
    Mr = 9,
    // A null RR (EXPERIMENTAL)
    Null = 10,
    // A well known service description
    Wks = 11,
    // A domain name pointer
    Ptr = 12,
    // Host information
    Hinfo = 13,
    // Mailbox or mail list information
    Minfo = 14,
    // Mail exchange
    Mx = 15,
    // Text strings
    Txt = 16,
    // A request for a transfer of an entire zone (question only)
    Axfr = 252,
    // A request for mailbox-related records, MB, MG or MR (question only)
    Mailb = 253,
    // A request for mail agent RRs, obsolete (question only)
    Maila = 254,
    // A request for all records (question only)
    All = 255,
}

impl RecordType {
    const ALL_TYPES: [RecordType; 20] = [
        RecordType::A,
        RecordType::Ns,
        RecordType::Md,
        RecordType::Mf,
        RecordType::Cname,
        RecordType::Soa,
        RecordType::Mb,
        RecordType::Mg,
        RecordType::Mr,
        RecordType::Null,
        RecordType::Wks,
        RecordType::Ptr,
        RecordType::Hinfo,
        RecordType::Minfo,
        RecordType::Mx,
        RecordType::Txt,
        RecordType::Axfr,
        RecordType::Mailb,
        RecordType::Maila,
        RecordType::All,
    ];

    /// Encode the record type as a 2-byte big-endian value.
    pub fn to_bytes(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }

    /// Mnemonic used in zone files.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Ns => "NS",
            RecordType::Md => "MD",
            RecordType::Mf => "MF",
            RecordType::Cname => "CNAME",
            RecordType::Soa => "SOA",
            RecordType::Mb => "MB",
            RecordType::Mg => "MG",
            RecordType::Mr => "MR",
            RecordType::Null => "NULL",
            RecordType::Wks => "WKS",
            RecordType::Ptr => "PTR",
            RecordType::Hinfo => "HINFO",
            RecordType::Minfo => "MINFO",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
            RecordType::Axfr => "AXFR",
            RecordType::Mailb => "MAILB",
            RecordType::Maila => "MAILA",
            RecordType::All => "ALL",
        }
    }

    /// AXFR, MAILB, MAILA and ALL may only appear in questions.
    pub fn is_question_only(self) -> bool {
        (self as u16) >= 252
    }
}

impl TryFrom<u16> for RecordType {
    type Error = DecodeErrors;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        RecordType::ALL_TYPES
            .iter()
            .copied()
            .find(|t| *t as u16 == value)
            .ok_or(DecodeErrors::UnknownRecordType(value))
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    /// Case-insensitive; `*` is accepted for [`RecordType::All`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(RecordType::All);
        }
        RecordType::ALL_TYPES
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown record type '{}'", s))
    }
}

/// CLASS fields of RFC 1035 §3.2.4 (and the `*` QCLASS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordClass {
    // The Internet
    In = 1,
    // CSNET (Obsolete)
    Cs = 2,
    // CHAOS
    Ch = 3,
    // Hesiod [Dyer 87]
    Hs = 4,
    // Any class (question only)
    Any = 255,
}

impl RecordClass {
    pub fn to_bytes(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordClass::In => "IN",
            RecordClass::Cs => "CS",
            RecordClass::Ch => "CH",
            RecordClass::Hs => "HS",
            RecordClass::Any => "ANY",
        }
    }

    /// Only the Internet class is supported by the decoder; everything else is
    /// [`DecodeErrors::UnsupportedClass`].
    pub(crate) fn expect_internet(value: u16) -> Result<RecordClass, DecodeErrors> {
        if value == RecordClass::In as u16 {
            Ok(RecordClass::In)
        } else {
            Err(DecodeErrors::UnsupportedClass(value))
        }
    }
}

impl Display for RecordClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            RecordClass::In,
            RecordClass::Cs,
            RecordClass::Ch,
            RecordClass::Hs,
            RecordClass::Any,
        ]
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unknown record class '{}'", s))
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        // Types and classes travel as their mnemonic, e.g. "MX" / "IN".
        impl Serialize for RecordType {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for RecordType {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }

        impl Serialize for RecordClass {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for RecordClass {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    }
}

/// One entry of the question section. The class is always IN and is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Question {
    /// The domain name being queried.
    pub name: String,
    /// The type of DNS record being requested (e.g., A, MX).
    pub record_type: RecordType,
}
