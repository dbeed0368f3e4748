//! # dnswire DNS library
//!
//! The library is split into features that allow you to choose the level of functionality:
//!
//! ## Features
//!
//! - **Agnostic (`agnostic`, with `default-features = false`)**
//!   - Pure DNS message encoding and decoding.
//!   - No built-in transport or async runtime; you can plug in your own.
//!   - Enabling `std` or `tokio-dep` next to it brings the transports back.
//!
//! - **Standard (`std`, default)**
//!   - Blocking UDP transport using `std::net`.
//!
//! - **Tokio (`tokio-dep`)**
//!   - Async UDP transport using `tokio::net`, with timeouts and cancellation.
//!
//! - **Serde (`serde`)**
//!   - `Serialize` / `Deserialize` for responses, records and questions.
//!
//! ## Modules
//!
//! - `resolver`: queries, responses, records and the UDP transporter.
//! - `compressor`: writes names with RFC 1035 compression.
//! - `errors`: the error enums shared by all of the above.

pub mod compressor;
pub mod errors;
mod reader;
pub mod resolver;
