//! HTTP gateway in front of the dispatch engine.
//!
//! One endpoint: `POST /matrix-multiply` with multipart fields
//! `matrixFile1`, `matrixFile2`, and `deadline` (decimal nanoseconds).
//! The response body is always plain text: the bracket-encoded product
//! on success, or the failure's description otherwise.

use crate::service::MatrixService;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Builds the gateway router over a connected service.
pub fn router(service: Arc<MatrixService>) -> Router {
    Router::new()
        .route("/matrix-multiply", post(matrix_multiply))
        .with_state(service)
}

/// Binds the gateway and serves until the process exits.
pub async fn serve(addr: SocketAddr, service: Arc<MatrixService>) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, "gateway listening");
    axum::serve(listener, router(service)).await
}

/// The uploaded request, collected from its multipart fields.
#[derive(Default)]
struct Upload {
    matrix_a: Option<String>,
    matrix_b: Option<String>,
    deadline: Option<String>,
}

async fn matrix_multiply(
    State(service): State<Arc<MatrixService>>,
    multipart: Multipart,
) -> (StatusCode, String) {
    let upload = match collect_upload(multipart).await {
        Ok(upload) => upload,
        Err(message) => return (StatusCode::BAD_REQUEST, message),
    };

    let (matrix_a, matrix_b, deadline) = match validate_upload(upload) {
        Ok(parts) => parts,
        Err(message) => return (StatusCode::BAD_REQUEST, message),
    };

    match service.multiply_text(&matrix_a, &matrix_b, deadline).await {
        Ok(product) => (StatusCode::OK, product),
        Err(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            error!(error = %e, "multiplication request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Drains the multipart stream into the three expected fields.
async fn collect_upload(mut multipart: Multipart) -> Result<Upload, String> {
    let mut upload = Upload::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(format!("malformed multipart request: {e}")),
        };

        let name = field.name().unwrap_or_default().to_string();
        let value = field
            .text()
            .await
            .map_err(|e| format!("unreadable field {name:?}: {e}"))?;

        match name.as_str() {
            "matrixFile1" => upload.matrix_a = Some(value),
            "matrixFile2" => upload.matrix_b = Some(value),
            "deadline" => upload.deadline = Some(value),
            // Unknown fields are ignored, matching lenient form handling.
            _ => {}
        }
    }

    Ok(upload)
}

/// Checks field presence and parses the deadline.
fn validate_upload(upload: Upload) -> Result<(String, String, Duration), String> {
    let matrix_a = upload
        .matrix_a
        .ok_or_else(|| "missing field matrixFile1".to_string())?;
    let matrix_b = upload
        .matrix_b
        .ok_or_else(|| "missing field matrixFile2".to_string())?;
    let deadline_text = upload
        .deadline
        .ok_or_else(|| "missing field deadline".to_string())?;

    let nanos: u64 = deadline_text
        .trim()
        .parse()
        .map_err(|_| format!("invalid deadline {deadline_text:?}: expected nanoseconds"))?;
    if nanos == 0 {
        return Err("deadline must be positive".to_string());
    }

    Ok((matrix_a, matrix_b, Duration::from_nanos(nanos)))
}
