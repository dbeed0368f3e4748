//! Resource records and their type-specific payloads (RFC 1035 §3.3).
//!
//! All RRs have the same top level format:
//!
//! ```text
//! NAME | TYPE (16) | CLASS (16) | TTL (32) | RDLENGTH (16) | RDATA (RDLENGTH bytes)
//! ```
//!
//! The preamble is read by [`Record::decode`]; RDATA is dispatched on TYPE by
//! [`RecordData::decode`] into one [`RecordData`] variant per record kind.
use crate::dns::errors::DecodeErrors;
use crate::dns::reader::MessageReader;
use crate::dns::resolver::types::{RecordClass, RecordType};
use std::net::Ipv4Addr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single resource record from the answer, authority or additional section.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    /// The domain name that owns this record.
    pub name: String,
    pub record_type: RecordType,
    pub class: RecordClass,
    /// Time-to-live of the record in seconds.
    pub ttl: u32,
    pub data: RecordData,
}

/// Start of a zone of authority.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoaData {
    /// Primary name server of the zone.
    pub mname: String,
    /// Mailbox of the person responsible for the zone.
    pub rname: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    /// Minimum TTL exported with any RR from this zone.
    pub minimum: u32,
}

/// Decoded RDATA, one variant per supported record type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RecordData {
    A(Ipv4Addr),
    Ns(String),
    Md(String),
    Mf(String),
    Cname(String),
    Soa(SoaData),
    Mb(String),
    Mg(String),
    Mr(String),
    /// Decoded through the label routine like a name; may not be human readable.
    Null(String),
    Wks {
        address: Ipv4Addr,
        protocol: u8,
        /// RDATA from the protocol byte onward.
        bitmap: Vec<u8>,
    },
    Ptr(String),
    Hinfo(String),
    Minfo {
        responsible_mailbox: String,
        error_mailbox: String,
    },
    Mx {
        preference: u16,
        exchange: String,
    },
    Txt(String),
}

impl RecordData {
    /// Decodes the RDATA that follows a record preamble.
    ///
    /// `data_length` delimits the payloads read as raw bytes (A, WKS, HINFO, TXT).
    /// Name-carrying payloads consume exactly the encoded bytes of their names.
    pub(crate) fn decode(
        reader: &mut MessageReader<'_>,
        record_type: u16,
        class: u16,
        data_length: u16,
    ) -> Result<RecordData, DecodeErrors> {
        RecordClass::expect_internet(class)?;

        let record_type = RecordType::try_from(record_type)?;
        let data = match record_type {
            RecordType::A => {
                if data_length != 4 {
                    return Err(DecodeErrors::InvalidRecordLength {
                        record_type: "A",
                        expected: "4",
                        found: data_length,
                    });
                }
                let b = reader.next(4)?;
                RecordData::A(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
            }
            RecordType::Ns => RecordData::Ns(reader.read_name()?),
            RecordType::Md => RecordData::Md(reader.read_name()?),
            RecordType::Mf => RecordData::Mf(reader.read_name()?),
            RecordType::Cname => RecordData::Cname(reader.read_name()?),
            RecordType::Mb => RecordData::Mb(reader.read_name()?),
            RecordType::Mg => RecordData::Mg(reader.read_name()?),
            RecordType::Mr => RecordData::Mr(reader.read_name()?),
            RecordType::Ptr => RecordData::Ptr(reader.read_name()?),
            RecordType::Soa => RecordData::Soa(SoaData {
                mname: reader.read_name()?,
                rname: reader.read_name()?,
                serial: reader.read_u32()?,
                refresh: reader.read_u32()?,
                retry: reader.read_u32()?,
                expire: reader.read_u32()?,
                minimum: reader.read_u32()?,
            }),
            RecordType::Null => RecordData::Null(reader.read_name()?),
            RecordType::Wks => {
                if data_length < 5 {
                    return Err(DecodeErrors::InvalidRecordLength {
                        record_type: "WKS",
                        expected: ">= 5",
                        found: data_length,
                    });
                }
                let raw = reader.next(data_length as usize)?;
                RecordData::Wks {
                    address: Ipv4Addr::new(raw[0], raw[1], raw[2], raw[3]),
                    protocol: raw[4],
                    bitmap: raw[4..].to_vec(),
                }
            }
            RecordType::Hinfo => RecordData::Hinfo(reader.read_text(data_length as usize)?),
            RecordType::Minfo => RecordData::Minfo {
                responsible_mailbox: reader.read_name()?,
                error_mailbox: reader.read_name()?,
            },
            RecordType::Mx => RecordData::Mx {
                preference: reader.read_u16()?,
                exchange: reader.read_name()?,
            },
            RecordType::Txt => RecordData::Txt(reader.read_text(data_length as usize)?),
            RecordType::Axfr | RecordType::Mailb | RecordType::Maila | RecordType::All => {
                return Err(DecodeErrors::UnknownRecordType(record_type as u16));
            }
        };

        Ok(data)
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A(_) => RecordType::A,
            RecordData::Ns(_) => RecordType::Ns,
            RecordData::Md(_) => RecordType::Md,
            RecordData::Mf(_) => RecordType::Mf,
            RecordData::Cname(_) => RecordType::Cname,
            RecordData::Soa(_) => RecordType::Soa,
            RecordData::Mb(_) => RecordType::Mb,
            RecordData::Mg(_) => RecordType::Mg,
            RecordData::Mr(_) => RecordType::Mr,
            RecordData::Null(_) => RecordType::Null,
            RecordData::Wks { .. } => RecordType::Wks,
            RecordData::Ptr(_) => RecordType::Ptr,
            RecordData::Hinfo(_) => RecordType::Hinfo,
            RecordData::Minfo { .. } => RecordType::Minfo,
            RecordData::Mx { .. } => RecordType::Mx,
            RecordData::Txt(_) => RecordType::Txt,
        }
    }

    /// The domain name a record points at: the target of NS, MD, MF, CNAME, MB, MG,
    /// MR and PTR, or the exchange of MX.
    pub fn domain_name(&self) -> Option<&str> {
        match self {
            RecordData::Ns(name)
            | RecordData::Md(name)
            | RecordData::Mf(name)
            | RecordData::Cname(name)
            | RecordData::Mb(name)
            | RecordData::Mg(name)
            | RecordData::Mr(name)
            | RecordData::Ptr(name) => Some(name),
            RecordData::Mx { exchange, .. } => Some(exchange),
            _ => None,
        }
    }
}

impl Record {
    /// Reads one resource record: preamble, then the type-specific payload.
    pub(crate) fn decode(reader: &mut MessageReader<'_>) -> Result<Record, DecodeErrors> {
        let name = reader.read_name()?;
        let record_type = reader.read_u16()?;
        let class = reader.read_u16()?;
        let ttl = reader.read_u32()?;
        let data_length = reader.read_u16()?;

        let data = RecordData::decode(reader, record_type, class, data_length)?;

        Ok(Record {
            name,
            record_type: data.record_type(),
            class: RecordClass::In,
            ttl,
            data,
        })
    }

    /// The address of an A record.
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        match self.data {
            RecordData::A(address) => Some(address),
            _ => None,
        }
    }
}
