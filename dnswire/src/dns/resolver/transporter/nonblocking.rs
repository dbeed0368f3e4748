//! Async UDP exchange on `tokio::net`.
use super::{
    DNS_PORT, TransportOptions, UDP_MESSAGE_LIMIT, bind_address, encode_for_udp,
    parse_server_literal,
};
use crate::dns::errors::TransportErrors;
use crate::dns::resolver::query::Query;
use crate::dns::resolver::response::Response;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket as TokioUdpSocket;
use tokio::time::timeout;
use tracing::debug;

async fn resolve_server_async(server: &str) -> Result<SocketAddr, TransportErrors> {
    if let Some(addr) = parse_server_literal(server) {
        return Ok(addr);
    }
    tokio::net::lookup_host((server.trim(), DNS_PORT))
        .await
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| TransportErrors::InvalidServer(server.to_string()))
}

/// Runs `op`, bounded by `limit` when one is configured.
async fn bounded<T, F>(limit: Option<Duration>, op: F) -> Result<T, TransportErrors>
where
    F: Future<Output = std::io::Result<T>>,
{
    match limit {
        Some(d) => timeout(d, op)
            .await
            .map_err(|_| TransportErrors::Elapsed(d))?
            .map_err(TransportErrors::from),
        None => op.await.map_err(TransportErrors::from),
    }
}

/// Sends `query` to `server` and awaits the response.
///
/// Same exchange as the blocking `send_query_with`; the timeouts of `options`
/// surface as [`TransportErrors::Elapsed`].
#[cfg_attr(docsrs, doc(cfg(feature = "tokio-dep")))]
pub async fn send_query_async(
    server: &str,
    query: &Query,
    options: &TransportOptions,
) -> Result<Response, TransportErrors> {
    let message = encode_for_udp(query)?;
    let server = resolve_server_async(server).await?;

    let socket = TokioUdpSocket::bind(bind_address(&server)).await?;
    socket.connect(server).await?;

    let bytes_sent = bounded(options.write_timeout, socket.send(&message)).await?;
    debug!(%server, id = query.id(), bytes_sent, "UDP query sent");

    let mut raw = Vec::with_capacity(UDP_MESSAGE_LIMIT);
    loop {
        let mut buf = [0u8; UDP_MESSAGE_LIMIT];
        let read = bounded(options.read_timeout, socket.recv(&mut buf)).await?;
        raw.extend_from_slice(&buf[..read]);

        if read < UDP_MESSAGE_LIMIT {
            break;
        }
    }
    debug!(%server, bytes_received = raw.len(), "UDP response received");

    Ok(Response::decode(&raw)?)
}
