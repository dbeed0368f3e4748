#![cfg_attr(docsrs, feature(doc_cfg))]
//! # dnswire
//!
//! A small DNS message codec following RFC 1035: query encoding with name
//! compression, response decoding for the classic record types, and a minimal UDP
//! transport to exchange one with a server.
//!
//! ## Feature Variants
//!
//! - **Agnostic version**
//!   - Only encoding/decoding of DNS messages and helpers.
//!   - No executor or transport included, the user chooses their own.
//!
//! - **Default (`std`) version**
//!   - Blocking UDP transport using `std::net`.
//!
//! - **Tokio (`tokio-dep`) version**
//!   - Async UDP transport using `tokio::net`.
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! dnswire = { version = "0.1", features = ["std"]}
//! dnswire = { version = "0.1", features = ["tokio-dep"]}
//! dnswire = { version = "0.1", default-features = false, features = ["agnostic"]}
//! ```
//!
//! ### Building a query
//!
//! ```rust
//! use dnswire::dns::resolver::{QueryBuilder, RecordType};
//!
//! let query = QueryBuilder::new()
//!     .recursion_desired()
//!     .add_question("example.com", RecordType::Mx)
//!     .build();
//!
//! let udp = query.as_bytes().unwrap();
//! let tcp = query.as_tcp_bytes().unwrap();
//! assert_eq!(tcp.len(), udp.len() + 2);
//! ```
//!
//! ### Sending it (std)
//!
//! ```rust,no_run
//! # #[cfg(feature = "std")]
//! # {
//! use dnswire::dns::resolver::{Query, RecordType};
//! use dnswire::dns::resolver::transporter::send_query;
//!
//! let query = Query::with_recursion("example.com", RecordType::A);
//! let response = send_query("9.9.9.9", &query).unwrap();
//!
//! for answer in response.answers() {
//!     println!("{:?}", answer.ipv4());
//! }
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, E>`; the error enums live in [`dns::errors`]:
//!
//! ```rust
//! use dnswire::dns::errors::{DecodeErrors, HeaderErrors};
//! use dnswire::dns::resolver::Response;
//!
//! // A query (QR bit clear) is not a response.
//! let query_shaped = [0u8; 12];
//! match Response::decode(&query_shaped) {
//!     Err(DecodeErrors::MalformedHeader(HeaderErrors::NotAResponse)) => {}
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (`debug` for the transport, `trace` for the
//! decoder) and never installs a subscriber itself.
//!
//! ## License
//!
//! This project is licensed under the MIT License.

pub mod dns;
