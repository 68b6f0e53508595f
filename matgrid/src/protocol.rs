//! Wire protocol between the dispatch engine and compute workers.
//!
//! Each exchange is one length-delimited JSON frame in each direction
//! over a persistent TCP connection:
//!
//! ```text
//! -> { "op": "multiply", "matrix_a": "[[1, 2], [3, 4]]", "matrix_b": "[[1, 0], [0, 1]]" }
//! <- { "matrix": "[[1, 2], [3, 4]]" }
//! <- { "error": "unknown operation: transpose" }
//! ```
//!
//! The operation travels as text rather than a closed enum so a worker
//! can name an operation it does not recognize in its failure reply.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

/// Operation name for element-wise block addition.
pub const OP_ADD: &str = "add";

/// Operation name for block multiplication.
pub const OP_MULTIPLY: &str = "multiply";

/// Errors raised while encoding or decoding protocol frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Frame payload was not a valid protocol message.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A block operation request.
///
/// Matrices travel as bracket-notation text (see [`crate::matrix`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockRequest {
    /// Operation name: [`OP_ADD`], [`OP_MULTIPLY`], or anything else a
    /// misbehaving client might send.
    pub op: String,
    pub matrix_a: String,
    pub matrix_b: String,
}

impl BlockRequest {
    pub fn new(op: &str, matrix_a: String, matrix_b: String) -> Self {
        Self {
            op: op.to_string(),
            matrix_a,
            matrix_b,
        }
    }
}

/// A block operation reply: the result matrix, or a failure message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockResponse {
    /// Successful result, bracket-notation text.
    Block { matrix: String },
    /// The worker rejected the call.
    Failure { error: String },
}

impl BlockResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error: message.into(),
        }
    }
}

/// A TCP stream with length-delimited framing applied.
pub type FramedStream = Framed<TcpStream, LengthDelimitedCodec>;

/// Wraps a TCP stream in the protocol's length-delimited framing.
pub fn frame(stream: TcpStream) -> FramedStream {
    Framed::new(stream, LengthDelimitedCodec::new())
}

/// Serializes a request into a frame payload.
pub fn encode_request(request: &BlockRequest) -> Result<Bytes, ProtocolError> {
    Ok(Bytes::from(serde_json::to_vec(request)?))
}

/// Deserializes a frame payload into a request.
pub fn decode_request(payload: &[u8]) -> Result<BlockRequest, ProtocolError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Serializes a response into a frame payload.
pub fn encode_response(response: &BlockResponse) -> Result<Bytes, ProtocolError> {
    Ok(Bytes::from(serde_json::to_vec(response)?))
}

/// Deserializes a frame payload into a response.
pub fn decode_response(payload: &[u8]) -> Result<BlockResponse, ProtocolError> {
    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_round_trips() {
        let request = BlockRequest::new(OP_MULTIPLY, "[[1]]".to_string(), "[[2]]".to_string());
        let payload = encode_request(&request).unwrap();
        let decoded = decode_request(&payload).unwrap();
        assert_eq!(decoded.op, OP_MULTIPLY);
        assert_eq!(decoded.matrix_a, "[[1]]");
        assert_eq!(decoded.matrix_b, "[[2]]");
    }

    #[test]
    fn test_block_response_round_trips() {
        let response = BlockResponse::Block {
            matrix: "[[3]]".to_string(),
        };
        let payload = encode_response(&response).unwrap();
        match decode_response(&payload).unwrap() {
            BlockResponse::Block { matrix } => assert_eq!(matrix, "[[3]]"),
            BlockResponse::Failure { error } => panic!("unexpected failure: {}", error),
        }
    }

    #[test]
    fn test_failure_response_round_trips() {
        let response = BlockResponse::failure("unknown operation: transpose");
        let payload = encode_response(&response).unwrap();
        match decode_response(&payload).unwrap() {
            BlockResponse::Failure { error } => {
                assert_eq!(error, "unknown operation: transpose");
            }
            BlockResponse::Block { .. } => panic!("expected failure"),
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_request(b"not json"),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            decode_response(b"{\"neither\": true}"),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn test_request_preserves_unknown_operation_names() {
        let request = BlockRequest::new("transpose", String::new(), String::new());
        let decoded = decode_request(&encode_request(&request).unwrap()).unwrap();
        assert_eq!(decoded.op, "transpose");
    }
}
