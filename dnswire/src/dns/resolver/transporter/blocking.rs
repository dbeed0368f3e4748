//! Blocking UDP exchange on `std::net`.
use super::{
    DNS_PORT, TransportOptions, UDP_MESSAGE_LIMIT, bind_address, encode_for_udp,
    parse_server_literal,
};
use crate::dns::errors::TransportErrors;
use crate::dns::resolver::query::Query;
use crate::dns::resolver::response::Response;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use tracing::debug;

/// Turns a caller supplied server into a socket address, resolving host names.
pub fn resolve_server(server: &str) -> Result<SocketAddr, TransportErrors> {
    if let Some(addr) = parse_server_literal(server) {
        return Ok(addr);
    }
    (server.trim(), DNS_PORT)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| TransportErrors::InvalidServer(server.to_string()))
}

/// Sends `query` to `server` and waits, without any timeout, for the response.
///
/// # Errors
/// Returns [`TransportErrors`] if the query is too large for UDP, the server is
/// invalid, the socket fails, or the reply cannot be decoded.
pub fn send_query(server: &str, query: &Query) -> Result<Response, TransportErrors> {
    send_query_with(server, query, &TransportOptions::default())
}

/// Like [`send_query`], with explicit socket timeouts.
pub fn send_query_with(
    server: &str,
    query: &Query,
    options: &TransportOptions,
) -> Result<Response, TransportErrors> {
    let message = encode_for_udp(query)?;
    let server = resolve_server(server)?;

    let socket = UdpSocket::bind(bind_address(&server))?;
    socket.set_read_timeout(options.read_timeout)?;
    socket.set_write_timeout(options.write_timeout)?;
    socket.connect(server)?;

    let bytes_sent = socket.send(&message)?;
    debug!(%server, id = query.id(), bytes_sent, "UDP query sent");

    let raw = read_reply(&socket)?;
    debug!(%server, bytes_received = raw.len(), "UDP response received");

    Ok(Response::decode(&raw)?)
}

fn read_reply(socket: &UdpSocket) -> Result<Vec<u8>, TransportErrors> {
    let mut raw = Vec::with_capacity(UDP_MESSAGE_LIMIT);
    loop {
        let mut buf = [0u8; UDP_MESSAGE_LIMIT];
        let read = socket.recv(&mut buf)?;
        raw.extend_from_slice(&buf[..read]);

        if read < UDP_MESSAGE_LIMIT {
            break;
        }
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::errors::DecodeErrors;
    use crate::dns::resolver::{QueryBuilder, RecordType};
    use std::net::Ipv4Addr;
    use std::thread;
    use std::time::Duration;

    /// Answers one query with an A record for the first question, echoing the id.
    fn spawn_fake_server(reply: fn(&[u8]) -> Vec<u8>) -> (SocketAddr, thread::JoinHandle<Vec<u8>>) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = socket.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let mut buf = [0u8; 512];
            let (len, from) = socket.recv_from(&mut buf).unwrap();
            let query = buf[..len].to_vec();
            socket.send_to(&reply(&query), from).unwrap();
            query
        });
        (addr, handle)
    }

    fn answer_with_a_record(query: &[u8]) -> Vec<u8> {
        let mut reply = query.to_vec();
        reply[2] = 0x81;
        reply[3] = 0x80;
        reply[7] = 1;
        reply.extend_from_slice(&[0xc0, 0x0c, 0x00, 0x01, 0x00, 0x01]);
        reply.extend_from_slice(&300u32.to_be_bytes());
        reply.extend_from_slice(&[0x00, 0x04, 93, 184, 216, 34]);
        reply
    }

    fn echo_query(query: &[u8]) -> Vec<u8> {
        query.to_vec()
    }

    #[test]
    fn test_send_query_to_local_server() {
        let (addr, handle) = spawn_fake_server(answer_with_a_record);
        let query = Query::with_recursion("Example.com", RecordType::A);
        let options = TransportOptions::new().read_timeout(Duration::from_secs(5));

        let response = send_query_with(&addr.to_string(), &query, &options).unwrap();
        let received = handle.join().unwrap();

        assert_eq!(received, query.as_bytes().unwrap());
        assert_eq!(response.id(), query.id());
        assert_eq!(response.questions()[0].name, "example.com");
        assert_eq!(
            response.answers()[0].ipv4(),
            Some(Ipv4Addr::new(93, 184, 216, 34))
        );
    }

    #[test]
    fn test_send_query_propagates_decode_errors() {
        // The server echoes the query back, so QR is still 0.
        let (addr, handle) = spawn_fake_server(echo_query);
        let query = Query::new("example.com", RecordType::A);
        let options = TransportOptions::new().read_timeout(Duration::from_secs(5));

        let err = send_query_with(&addr.to_string(), &query, &options).unwrap_err();
        handle.join().unwrap();

        assert!(matches!(
            err,
            TransportErrors::Decode(DecodeErrors::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_send_query_rejects_oversized_query_before_sending() {
        let mut builder = QueryBuilder::new();
        for i in 0..40 {
            builder = builder.add_question(&format!("name-{i:02}.example.net"), RecordType::Txt);
        }
        let query = builder.build();

        // Nothing listens on this port; the size check must fail first.
        let err = send_query("127.0.0.1:9", &query).unwrap_err();
        assert!(matches!(err, TransportErrors::MessageTooLarge { .. }));
    }

    #[test]
    fn test_send_query_read_timeout() {
        let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = silent.local_addr().unwrap();
        let query = Query::new("example.com", RecordType::A);
        let options = TransportOptions::new().read_timeout(Duration::from_millis(100));

        let err = send_query_with(&addr.to_string(), &query, &options).unwrap_err();
        assert!(matches!(err, TransportErrors::SocketIo(_)));
    }

    #[test]
    fn test_resolve_server_invalid() {
        assert!(matches!(
            resolve_server("no such host!"),
            Err(TransportErrors::InvalidServer(_))
        ));
        assert_eq!(
            resolve_server("9.9.9.9").unwrap(),
            "9.9.9.9:53".parse::<SocketAddr>().unwrap()
        );
    }
}
