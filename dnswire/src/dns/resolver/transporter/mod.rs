//! # DNS Transporter
//!
//! Sends one encoded [`Query`] over UDP and hands the reply to the response decoder.
//!
//! - One socket per query, bound to the wildcard address of the server's family and
//!   connected to the server. No pooling, no retries, no TCP fallback.
//! - Queries larger than [`UDP_MESSAGE_LIMIT`] bytes are rejected before any socket
//!   is opened.
//! - The reply is read in 512-byte chunks until a read returns fewer than 512 bytes.
//! - Decode errors are returned unchanged inside [`TransportErrors::Decode`].
//!
//! ## Servers
//!
//! The server is caller supplied. A socket address (`"1.1.1.1:5353"`,
//! `"[2606:4700:4700::1111]:53"`) is used as given; a bare IP address or host name
//! gets port 53.
//!
//! ## Timeouts
//!
//! By default nothing times out, like a plain blocking socket. Use
//! [`TransportOptions`] to bound the wait:
//!
//! ```rust,no_run
//! # #[cfg(feature = "std")]
//! # {
//! use std::time::Duration;
//! use dnswire::dns::resolver::{Query, RecordType};
//! use dnswire::dns::resolver::transporter::{TransportOptions, send_query_with};
//!
//! let query = Query::with_recursion("example.com", RecordType::A);
//! let options = TransportOptions::new().read_timeout(Duration::from_secs(3));
//! let response = send_query_with("8.8.8.8", &query, &options).unwrap();
//! println!("{:#?}", response.answers());
//! # }
//! ```
//!
//! With the `tokio-dep` feature the same exchange is available as
//! `send_query_async`, where dropping the future cancels the query.
use crate::dns::errors::TransportErrors;
use crate::dns::resolver::query::Query;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Size floor of a UDP DNS message (RFC 1035 §4.2.1); also the read chunk size.
pub const UDP_MESSAGE_LIMIT: usize = 512;
pub const DNS_PORT: u16 = 53;

/// Socket settings for a single exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportOptions {
    /// Deadline for every read of the reply; `None` waits forever.
    pub read_timeout: Option<Duration>,
    /// Deadline for writing the query; `None` waits forever.
    pub write_timeout: Option<Duration>,
}

impl TransportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }
}

/// Encodes `query` and enforces the UDP size ceiling.
pub(crate) fn encode_for_udp(query: &Query) -> Result<Vec<u8>, TransportErrors> {
    let bytes = query.as_bytes()?;
    if bytes.len() > UDP_MESSAGE_LIMIT {
        return Err(TransportErrors::MessageTooLarge {
            size: bytes.len(),
            limit: UDP_MESSAGE_LIMIT,
        });
    }
    Ok(bytes)
}

/// Parses an address literal; `None` means the server is a host name.
pub(crate) fn parse_server_literal(server: &str) -> Option<SocketAddr> {
    let server = server.trim();
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Some(addr);
    }
    server
        .parse::<IpAddr>()
        .ok()
        .map(|ip| SocketAddr::new(ip, DNS_PORT))
}

/// Wildcard local address matching the family of `server`.
pub(crate) fn bind_address(server: &SocketAddr) -> SocketAddr {
    if server.is_ipv4() {
        SocketAddr::from(([0, 0, 0, 0], 0))
    } else {
        SocketAddr::from(([0u16; 8], 0))
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        mod blocking;
        pub use self::blocking::{resolve_server, send_query, send_query_with};
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "tokio-dep")] {
        mod nonblocking;
        #[cfg_attr(docsrs, doc(cfg(feature = "tokio-dep")))]
        pub use self::nonblocking::send_query_async;
    }
}
