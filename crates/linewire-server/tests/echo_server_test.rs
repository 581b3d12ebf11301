//! Echo server integration tests over loopback.

use std::{net::SocketAddr, time::Duration};

use linewire_client::{ClientConfig, InboundMessage, NetworkLoop, OutboundMessage, SessionEnd, handoff};
use linewire_server::{EchoServer, ServerConfig, ServerError};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    sync::oneshot,
    task::JoinHandle,
    time::timeout,
};

const WAIT: Duration = Duration::from_secs(5);

struct RunningServer {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<(), ServerError>>,
}

fn start(read_buffer_size: usize) -> RunningServer {
    let config = ServerConfig {
        bind_address: "127.0.0.1:0".to_string(),
        read_buffer_size,
        ..ServerConfig::default()
    };
    let server = EchoServer::bind(config).unwrap();
    let addr = server.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let task = tokio::spawn(server.run_until(async {
        let _ = stopped.await;
    }));

    RunningServer { addr, stop, task }
}

async fn round_trip(stream: &mut TcpStream, payload: &[u8]) -> Vec<u8> {
    stream.write_all(payload).await.unwrap();
    let mut echoed = vec![0u8; payload.len()];
    timeout(WAIT, stream.read_exact(&mut echoed)).await.unwrap().unwrap();
    echoed
}

#[tokio::test]
async fn echoes_bytes_back() {
    let server = start(1000);
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    assert_eq!(round_trip(&mut stream, b"hello\n").await, b"hello\n");
    assert_eq!(round_trip(&mut stream, b"no newline").await, b"no newline");
}

#[tokio::test]
async fn payload_larger_than_read_buffer_arrives_whole() {
    let server = start(4);
    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    let payload: Vec<u8> = (0..=255u8).cycle().take(1000).collect();

    assert_eq!(round_trip(&mut stream, &payload).await, payload);
}

#[tokio::test]
async fn clients_are_served_independently() {
    let server = start(1000);
    let mut first = TcpStream::connect(server.addr).await.unwrap();
    let mut second = TcpStream::connect(server.addr).await.unwrap();

    assert_eq!(round_trip(&mut second, b"second\n").await, b"second\n");
    assert_eq!(round_trip(&mut first, b"first\n").await, b"first\n");
}

#[tokio::test]
async fn server_outlives_closed_connections() {
    let server = start(1000);

    let mut gone = TcpStream::connect(server.addr).await.unwrap();
    assert_eq!(round_trip(&mut gone, b"bye").await, b"bye");
    drop(gone);

    let mut next = TcpStream::connect(server.addr).await.unwrap();
    assert_eq!(round_trip(&mut next, b"still here").await, b"still here");
}

#[tokio::test]
async fn client_close_is_answered_with_close() {
    let server = start(1000);
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    stream.shutdown().await.unwrap();
    let mut rest = Vec::new();
    let n = timeout(WAIT, stream.read_to_end(&mut rest)).await.unwrap().unwrap();

    assert_eq!(n, 0);
}

#[tokio::test]
async fn shutdown_stops_the_accept_loop() {
    let server = start(1000);
    let mut open = TcpStream::connect(server.addr).await.unwrap();
    assert_eq!(round_trip(&mut open, b"x").await, b"x");

    server.stop.send(()).unwrap();
    let result = timeout(WAIT, server.task).await.unwrap().unwrap();

    assert!(result.is_ok());
    // Open connections are aborted along with the listener
    let mut rest = Vec::new();
    let closed = timeout(WAIT, open.read_to_end(&mut rest)).await.unwrap();
    assert!(closed.is_err() || closed.unwrap() == 0);
}

#[tokio::test]
async fn bad_bind_address_is_a_config_error() {
    let config = ServerConfig { bind_address: "not an address".to_string(), ..ServerConfig::default() };

    assert!(matches!(EchoServer::bind(config), Err(ServerError::Config(_))));
}

#[tokio::test]
async fn zero_read_buffer_is_a_config_error() {
    let config = ServerConfig {
        bind_address: "127.0.0.1:0".to_string(),
        read_buffer_size: 0,
        ..ServerConfig::default()
    };

    assert!(matches!(EchoServer::bind(config), Err(ServerError::Config(_))));
}

#[tokio::test]
async fn client_network_loop_round_trip() {
    let server = start(3);
    let (to_network, outbound) = handoff();
    let (inbound, mut from_network) = handoff();
    let network = NetworkLoop::new(ClientConfig::default(), outbound, inbound);
    let port = server.addr.port();
    let network = tokio::spawn(async move { network.run("127.0.0.1", port).await });

    to_network.push(OutboundMessage::UserLine("hello".into()));
    to_network.push(OutboundMessage::UserLine("a longer line than the read size".into()));

    let mut received = Vec::new();
    while received.len() < 3 {
        received.push(timeout(WAIT, from_network.pop()).await.unwrap().unwrap());
    }
    to_network.push(OutboundMessage::Quit);
    let end = timeout(WAIT, network).await.unwrap().unwrap().unwrap();

    assert!(matches!(received[0], InboundMessage::Connected { .. }));
    assert_eq!(received[1..], [
        InboundMessage::ServerLine("hello".into()),
        InboundMessage::ServerLine("a longer line than the read size".into())
    ]);
    assert_eq!(end, SessionEnd::QuitRequested);
}
