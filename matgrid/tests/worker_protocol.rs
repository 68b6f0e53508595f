//! Integration tests for the worker wire protocol.
//!
//! These drive a live worker with raw framed requests to pin down the
//! protocol-level behavior: bad calls are answered, never fatal, and
//! the connection stays usable afterwards.

use futures::{SinkExt, StreamExt};
use matgrid::protocol::{
    self, BlockRequest, BlockResponse, FramedStream, OP_ADD, OP_MULTIPLY,
};
use matgrid::worker::WorkerServer;
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

async fn start_worker() -> (SocketAddr, CancellationToken) {
    let server = WorkerServer::bind(0, "127.0.0.1:0".parse().unwrap())
        .await
        .expect("failed to bind worker");
    let addr = server.local_addr().unwrap();
    let token = CancellationToken::new();
    tokio::spawn(server.serve(token.clone()));
    (addr, token)
}

async fn open_connection(addr: SocketAddr) -> FramedStream {
    let stream = TcpStream::connect(addr).await.expect("failed to connect");
    protocol::frame(stream)
}

async fn exchange(framed: &mut FramedStream, request: &BlockRequest) -> BlockResponse {
    let payload = protocol::encode_request(request).unwrap();
    framed.send(payload).await.expect("send failed");
    let frame = framed
        .next()
        .await
        .expect("connection closed")
        .expect("framing error");
    protocol::decode_response(&frame).expect("undecodable response")
}

#[tokio::test]
async fn test_multiply_request_round_trips() {
    let (addr, _token) = start_worker().await;
    let mut framed = open_connection(addr).await;

    let request = BlockRequest::new(
        OP_MULTIPLY,
        "[[1, 2], [3, 4]]".to_string(),
        "[[5, 6], [7, 8]]".to_string(),
    );

    match exchange(&mut framed, &request).await {
        BlockResponse::Block { matrix } => assert_eq!(matrix, "[[19, 22], [43, 50]]"),
        BlockResponse::Failure { error } => panic!("unexpected failure: {error}"),
    }
}

#[tokio::test]
async fn test_add_request_round_trips() {
    let (addr, _token) = start_worker().await;
    let mut framed = open_connection(addr).await;

    let request = BlockRequest::new(
        OP_ADD,
        "[[1, 2], [3, 4]]".to_string(),
        "[[10, 20], [30, 40]]".to_string(),
    );

    match exchange(&mut framed, &request).await {
        BlockResponse::Block { matrix } => assert_eq!(matrix, "[[11, 22], [33, 44]]"),
        BlockResponse::Failure { error } => panic!("unexpected failure: {error}"),
    }
}

#[tokio::test]
async fn test_unknown_operation_is_named_and_non_fatal() {
    let (addr, _token) = start_worker().await;
    let mut framed = open_connection(addr).await;

    let bogus = BlockRequest::new("transpose", "[[1]]".to_string(), "[[1]]".to_string());
    match exchange(&mut framed, &bogus).await {
        BlockResponse::Failure { error } => {
            assert_eq!(error, "unknown operation: transpose");
        }
        BlockResponse::Block { .. } => panic!("expected failure"),
    }

    // Same connection must still serve valid requests.
    let valid = BlockRequest::new(OP_MULTIPLY, "[[2]]".to_string(), "[[3]]".to_string());
    match exchange(&mut framed, &valid).await {
        BlockResponse::Block { matrix } => assert_eq!(matrix, "[[6]]"),
        BlockResponse::Failure { error } => panic!("unexpected failure: {error}"),
    }
}

#[tokio::test]
async fn test_dimension_mismatch_is_reported_not_fatal() {
    let (addr, _token) = start_worker().await;
    let mut framed = open_connection(addr).await;

    let mismatched = BlockRequest::new(
        OP_ADD,
        "[[1, 2], [3, 4]]".to_string(),
        "[[1]]".to_string(),
    );
    match exchange(&mut framed, &mismatched).await {
        BlockResponse::Failure { error } => assert!(error.contains("operand sizes differ")),
        BlockResponse::Block { .. } => panic!("expected failure"),
    }

    let valid = BlockRequest::new(OP_ADD, "[[1]]".to_string(), "[[1]]".to_string());
    match exchange(&mut framed, &valid).await {
        BlockResponse::Block { matrix } => assert_eq!(matrix, "[[2]]"),
        BlockResponse::Failure { error } => panic!("unexpected failure: {error}"),
    }
}

#[tokio::test]
async fn test_undecodable_matrix_text_is_reported() {
    let (addr, _token) = start_worker().await;
    let mut framed = open_connection(addr).await;

    let request = BlockRequest::new(OP_MULTIPLY, "rubbish".to_string(), "[[1]]".to_string());
    match exchange(&mut framed, &request).await {
        BlockResponse::Failure { error } => assert!(error.contains("malformed matrix text")),
        BlockResponse::Block { .. } => panic!("expected failure"),
    }
}

#[tokio::test]
async fn test_two_connections_are_served_independently() {
    let (addr, _token) = start_worker().await;
    let mut first = open_connection(addr).await;
    let mut second = open_connection(addr).await;

    let request = BlockRequest::new(OP_MULTIPLY, "[[3]]".to_string(), "[[4]]".to_string());

    match exchange(&mut second, &request).await {
        BlockResponse::Block { matrix } => assert_eq!(matrix, "[[12]]"),
        BlockResponse::Failure { error } => panic!("unexpected failure: {error}"),
    }
    match exchange(&mut first, &request).await {
        BlockResponse::Block { matrix } => assert_eq!(matrix, "[[12]]"),
        BlockResponse::Failure { error } => panic!("unexpected failure: {error}"),
    }
}
