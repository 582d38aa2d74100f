use thiserror::Error;

/// Failures surfaced by the scheduler backend.
///
/// `Transport` covers unreachable-backend and malformed-response cases;
/// `Backend` is a well-formed non-2xx reply, carrying the `detail` string
/// from the error payload when the backend provided one.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{detail}")]
    Backend { status: u16, detail: String },
}

impl ApiError {
    /// The backend-provided detail text, if this was a backend rejection.
    pub fn backend_detail(&self) -> Option<&str> {
        match self {
            ApiError::Backend { detail, .. } => Some(detail),
            ApiError::Transport(_) => None,
        }
    }
}
