//! Service error types.

use crate::dispatch::DispatchError;
use crate::fleet::CallError;
use crate::matrix::MatrixError;
use thiserror::Error;

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An uploaded matrix failed validation before dispatch.
    #[error("invalid matrix: {0}")]
    Validation(#[source] MatrixError),

    /// Fleet channels could not be opened.
    #[error("fleet connect failed: {0}")]
    Connect(#[from] CallError),

    /// The dispatch engine gave up on the request.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ServiceError {
    /// True when the failure is the caller's input rather than the
    /// fleet's behavior. The gateway maps these to client errors.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::Dispatch(DispatchError::ShapeMismatch { .. })
                | ServiceError::Dispatch(DispatchError::ZeroDeadline)
                | ServiceError::Dispatch(DispatchError::Blocks(_))
        )
    }
}
