//! # dnswire resolver
//!
//! Messages of [RFC 1035](https://datatracker.ietf.org/doc/html/rfc1035): queries
//! are built and encoded, responses are decoded, and (with `std` / `tokio-dep`) a
//! query can be exchanged with a server over UDP.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "std")]
//! # {
//! use dnswire::dns::resolver::{RecordType, resolve};
//!
//! match resolve("1.1.1.1", "example.com", RecordType::Mx) {
//!     Ok(response) => {
//!         for answer in response.answers() {
//!             println!("{}: {:?}", answer.name, answer.data);
//!         }
//!     }
//!     Err(e) => eprintln!("DNS resolution failed: {e}"),
//! }
//! # }
//! ```
//!
//! Decoding works on any buffer, whatever brought it in:
//!
//! ```rust
//! use dnswire::dns::resolver::{Response, RecordData};
//!
//! let bytes = [
//!     0x12, 0x34, 0x81, 0x80, 0, 1, 0, 1, 0, 0, 0, 0,
//!     7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0, 0, 1, 0, 1,
//!     0xc0, 0x0c, 0, 1, 0, 1, 0, 0, 0x01, 0x2c, 0, 4, 93, 184, 216, 34,
//! ];
//! let response = Response::decode(&bytes).unwrap();
//!
//! assert_eq!(response.answers()[0].name, "example.com");
//! assert_eq!(response.answers()[0].data, RecordData::A([93, 184, 216, 34].into()));
//! ```
//!
//! ## Supported Record Types
//!
//! - `A`, `NS`, `MD`, `MF`, `CNAME`, `SOA`, `MB`, `MG`, `MR`, `NULL`, `WKS`, `PTR`,
//!   `HINFO`, `MINFO`, `MX`, `TXT`
//! - `AXFR`, `MAILB`, `MAILA` and `ALL` may be asked for in questions only
//!
//! Any other TYPE in a response is a decode error, never silently skipped.
//!
//! ## Error Handling
//!
//! - `DecodeErrors`: parsing failures, wrapped with the byte offset for records.
//! - `EncodeErrors`: names that cannot be written to the wire.
//! - `TransportErrors`: network failures, oversized queries and decode failures
//!   of the reply.

mod query;
mod record;
mod response;
mod types;

pub use self::query::{Query, QueryBuilder};
pub use self::record::{Record, RecordData, SoaData};
pub use self::response::{RecordMap, Response, parse_response};
pub use self::types::{
    HeaderFlags, HeaderSection, OpCodeOptions, Question, RecordClass, RecordType, ResponseCode,
};

cfg_if::cfg_if! {
    if #[cfg(any(feature = "std", feature = "tokio-dep"))] {
        pub mod transporter;
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        use crate::dns::errors::TransportErrors;

        /// Sends a recursive single-question query for `name` to `server` and waits for
        /// the response.
        ///
        /// # Errors
        /// Returns [`TransportErrors`] if the query could not be sent or decoded.
        pub fn resolve(
            server: &str,
            name: &str,
            record_type: RecordType,
        ) -> Result<Response, TransportErrors> {
            let query = Query::with_recursion(name, record_type);
            transporter::send_query(server, &query)
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "tokio-dep")] {
        use crate::dns::resolver::transporter::TransportOptions;

        /// Async version of [`resolve`], bounded by the timeouts of `options`.
        #[cfg_attr(docsrs, doc(cfg(feature = "tokio-dep")))]
        pub async fn resolve_async(
            server: &str,
            name: &str,
            record_type: RecordType,
            options: &TransportOptions,
        ) -> Result<Response, crate::dns::errors::TransportErrors> {
            let query = Query::with_recursion(name, record_type);
            transporter::send_query_async(server, &query, options).await
        }
    }
}
