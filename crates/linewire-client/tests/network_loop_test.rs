//! Integration tests for the network loop.
//!
//! Every test runs the real loop against a real loopback socket. The server
//! side is scripted inline so each test controls exactly which bytes cross
//! the wire and when the peer closes.

use std::{net::SocketAddr, time::Duration};

use linewire_client::{
    ClientConfig, HandoffReceiver, HandoffSender, InboundMessage, NetworkError, NetworkLoop,
    OutboundMessage, PopError, SessionEnd, handoff,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
    time::timeout,
};

const WAIT: Duration = Duration::from_secs(5);

struct Harness {
    to_network: HandoffSender<OutboundMessage>,
    from_network: HandoffReceiver<InboundMessage>,
    network: JoinHandle<Result<SessionEnd, NetworkError>>,
}

/// Spawn a network loop against `addr`.
fn spawn_loop(addr: SocketAddr, config: ClientConfig) -> Harness {
    let (to_network, outbound) = handoff();
    let (inbound, from_network) = handoff();
    let network = NetworkLoop::new(config, outbound, inbound);
    let host = addr.ip().to_string();
    let port = addr.port();
    let network = tokio::spawn(async move { network.run(&host, port).await });

    Harness { to_network, from_network, network }
}

/// Bind a loopback listener on an ephemeral port.
async fn listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

async fn next_inbound(rx: &mut HandoffReceiver<InboundMessage>) -> InboundMessage {
    timeout(WAIT, rx.pop()).await.expect("inbound message in time").expect("queue open")
}

async fn expect_connected(rx: &mut HandoffReceiver<InboundMessage>) {
    let message = next_inbound(rx).await;
    assert!(matches!(message, InboundMessage::Connected { .. }), "got {message:?}");
}

async fn expect_line(rx: &mut HandoffReceiver<InboundMessage>, expected: &str) {
    assert_eq!(next_inbound(rx).await, InboundMessage::ServerLine(expected.to_string()));
}

async fn finish(network: JoinHandle<Result<SessionEnd, NetworkError>>) -> SessionEnd {
    timeout(WAIT, network).await.expect("loop exits in time").unwrap().unwrap()
}

/// Read from `stream` until `n` bytes have arrived.
async fn read_exactly(stream: &mut TcpStream, n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    timeout(WAIT, stream.read_exact(&mut buf)).await.unwrap().unwrap();
    buf
}

#[tokio::test]
async fn echoed_line_lands_in_inbound_queue() {
    let (listener, addr) = listener().await;
    let mut harness = spawn_loop(addr, ClientConfig::default());

    let (mut server, _) = listener.accept().await.unwrap();
    expect_connected(&mut harness.from_network).await;

    harness.to_network.push(OutboundMessage::UserLine("hello".into()));

    let wire = read_exactly(&mut server, 6).await;
    assert_eq!(wire, b"hello\n");
    server.write_all(&wire).await.unwrap();

    expect_line(&mut harness.from_network, "hello").await;

    harness.to_network.push(OutboundMessage::Quit);
    assert_eq!(finish(harness.network).await, SessionEnd::QuitRequested);
    assert_eq!(next_inbound(&mut harness.from_network).await, InboundMessage::Quit);
}

#[tokio::test]
async fn partial_line_is_held_until_terminated() {
    let (listener, addr) = listener().await;
    let mut harness = spawn_loop(addr, ClientConfig::default());

    let (mut server, _) = listener.accept().await.unwrap();
    expect_connected(&mut harness.from_network).await;

    server.write_all(b"a\nb\nc").await.unwrap();
    expect_line(&mut harness.from_network, "a").await;
    expect_line(&mut harness.from_network, "b").await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(harness.from_network.try_pop(), Err(PopError::Empty));

    server.write_all(b"d\n").await.unwrap();
    expect_line(&mut harness.from_network, "cd").await;

    drop(server);
    assert_eq!(finish(harness.network).await, SessionEnd::PeerClosed);
    assert_eq!(next_inbound(&mut harness.from_network).await, InboundMessage::Quit);
}

#[tokio::test]
async fn unterminated_tail_is_flushed_on_close() {
    let (listener, addr) = listener().await;
    let mut harness = spawn_loop(addr, ClientConfig::default());

    let (mut server, _) = listener.accept().await.unwrap();
    expect_connected(&mut harness.from_network).await;

    server.write_all(b"line\ntail").await.unwrap();
    server.shutdown().await.unwrap();
    drop(server);

    expect_line(&mut harness.from_network, "line").await;
    expect_line(&mut harness.from_network, "tail").await;
    assert_eq!(next_inbound(&mut harness.from_network).await, InboundMessage::Quit);
    assert_eq!(finish(harness.network).await, SessionEnd::PeerClosed);
}

#[tokio::test]
async fn peer_close_yields_exactly_one_quit() {
    let (listener, addr) = listener().await;
    let mut harness = spawn_loop(addr, ClientConfig::default());

    let (server, _) = listener.accept().await.unwrap();
    expect_connected(&mut harness.from_network).await;
    drop(server);

    assert_eq!(finish(harness.network).await, SessionEnd::PeerClosed);
    assert_eq!(next_inbound(&mut harness.from_network).await, InboundMessage::Quit);

    // Loop is gone: queue reports closed with nothing else left in it
    assert_eq!(harness.from_network.try_pop(), Err(PopError::Closed));
}

#[tokio::test]
async fn quit_is_never_written_to_the_wire() {
    let (listener, addr) = listener().await;
    let mut harness = spawn_loop(addr, ClientConfig::default());

    let (mut server, _) = listener.accept().await.unwrap();
    expect_connected(&mut harness.from_network).await;

    harness.to_network.push(OutboundMessage::Quit);
    assert_eq!(finish(harness.network).await, SessionEnd::QuitRequested);

    // Socket was closed without a single byte sent
    let mut received = Vec::new();
    timeout(WAIT, server.read_to_end(&mut received)).await.unwrap().unwrap();
    assert!(received.is_empty(), "unexpected bytes: {received:?}");

    assert_eq!(next_inbound(&mut harness.from_network).await, InboundMessage::Quit);
}

#[tokio::test]
async fn lines_before_quit_are_delivered_in_order() {
    let (listener, addr) = listener().await;
    let mut harness = spawn_loop(addr, ClientConfig::default());

    let (mut server, _) = listener.accept().await.unwrap();
    expect_connected(&mut harness.from_network).await;

    for word in ["one", "two", "three"] {
        harness.to_network.push(OutboundMessage::UserLine(word.into()));
    }
    harness.to_network.push(OutboundMessage::Quit);
    assert_eq!(finish(harness.network).await, SessionEnd::QuitRequested);

    let mut received = Vec::new();
    timeout(WAIT, server.read_to_end(&mut received)).await.unwrap().unwrap();
    assert_eq!(received, b"one\ntwo\nthree\n");
}

#[tokio::test]
async fn long_lines_are_truncated() {
    let (listener, addr) = listener().await;
    let config = ClientConfig { max_line_bytes: 8, ..ClientConfig::default() };
    let mut harness = spawn_loop(addr, config);

    let (mut server, _) = listener.accept().await.unwrap();
    expect_connected(&mut harness.from_network).await;

    harness.to_network.push(OutboundMessage::UserLine("0123456789abcdef".into()));
    assert_eq!(read_exactly(&mut server, 9).await, b"01234567\n");

    harness.to_network.push(OutboundMessage::Quit);
    finish(harness.network).await;
}

#[tokio::test]
async fn binary_lines_are_escaped() {
    let (listener, addr) = listener().await;
    let mut harness = spawn_loop(addr, ClientConfig::default());

    let (mut server, _) = listener.accept().await.unwrap();
    expect_connected(&mut harness.from_network).await;

    server.write_all(b"\xff\xfeok\n").await.unwrap();
    expect_line(&mut harness.from_network, "\\xff\\xfeok").await;

    harness.to_network.push(OutboundMessage::Quit);
    finish(harness.network).await;
}

#[tokio::test]
async fn one_bad_byte_escapes_every_line_in_the_read() {
    let (listener, addr) = listener().await;
    let mut harness = spawn_loop(addr, ClientConfig::default());

    let (mut server, _) = listener.accept().await.unwrap();
    expect_connected(&mut harness.from_network).await;

    server.write_all(b"\xc3\xa9\n\xff\n").await.unwrap();
    expect_line(&mut harness.from_network, "\\xc3\\xa9").await;
    expect_line(&mut harness.from_network, "\\xff").await;

    harness.to_network.push(OutboundMessage::Quit);
    finish(harness.network).await;
}

#[tokio::test]
async fn small_reads_reassemble_lines() {
    let (listener, addr) = listener().await;
    let config = ClientConfig { read_chunk_size: 3, ..ClientConfig::default() };
    let mut harness = spawn_loop(addr, config);

    let (mut server, _) = listener.accept().await.unwrap();
    expect_connected(&mut harness.from_network).await;

    server.write_all(b"first line\nsecond line\n").await.unwrap();
    expect_line(&mut harness.from_network, "first line").await;
    expect_line(&mut harness.from_network, "second line").await;

    harness.to_network.push(OutboundMessage::Quit);
    finish(harness.network).await;
}

#[tokio::test]
async fn refused_connection_reports_failure_without_quit() {
    // Grab a free port, then release it so nothing is listening
    let (listener, addr) = listener().await;
    drop(listener);

    let config = ClientConfig { connect_timeout: Duration::from_millis(500), ..ClientConfig::default() };
    let mut harness = spawn_loop(addr, config);

    let result = timeout(WAIT, harness.network).await.unwrap().unwrap();
    assert!(matches!(result, Err(NetworkError::Connect { .. })), "got {result:?}");

    let message = next_inbound(&mut harness.from_network).await;
    assert!(matches!(message, InboundMessage::ConnectFailed { .. }), "got {message:?}");
    assert_eq!(harness.from_network.try_pop(), Err(PopError::Closed));
}

async fn expect_connect_failure(mut harness: Harness) -> String {
    let result = timeout(WAIT, harness.network).await.unwrap().unwrap();
    assert!(matches!(result, Err(NetworkError::Connect { .. })), "got {result:?}");

    let message = next_inbound(&mut harness.from_network).await;
    assert_eq!(harness.from_network.try_pop(), Err(PopError::Closed));
    match message {
        InboundMessage::ConnectFailed { reason } => reason,
        other => panic!("expected ConnectFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn connect_timeout_reports_failure_without_quit() {
    // Something is listening, but no handshake completes within zero time
    let (_listener, addr) = listener().await;
    let config = ClientConfig { connect_timeout: Duration::ZERO, ..ClientConfig::default() };

    let reason = expect_connect_failure(spawn_loop(addr, config)).await;

    assert!(reason.contains("timed out"), "got {reason:?}");
}

#[tokio::test]
async fn unresolvable_host_reports_failure_without_quit() {
    let (to_network, outbound) = handoff();
    let (inbound, from_network) = handoff();
    let config = ClientConfig { connect_timeout: Duration::from_secs(2), ..ClientConfig::default() };
    let network = NetworkLoop::new(config, outbound, inbound);
    let network = tokio::spawn(async move { network.run("linewire-test.invalid", 1234).await });

    let reason = expect_connect_failure(Harness { to_network, from_network, network }).await;

    assert!(!reason.is_empty());
}

#[tokio::test]
async fn dropping_the_outbound_sender_ends_the_session() {
    let (listener, addr) = listener().await;
    let mut harness = spawn_loop(addr, ClientConfig::default());

    let (_server, _) = listener.accept().await.unwrap();
    expect_connected(&mut harness.from_network).await;

    drop(harness.to_network);
    assert_eq!(finish(harness.network).await, SessionEnd::QuitRequested);
    assert_eq!(next_inbound(&mut harness.from_network).await, InboundMessage::Quit);
}
