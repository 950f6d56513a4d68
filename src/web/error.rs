use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use super::routes::WaitlistError;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("waitlist error: {0}")]
    Waitlist(#[from] WaitlistError),

    #[error("unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl Error {
    /// Maps a server error to what the client is allowed to see.
    /// Only malformed emails are reported as such, everything else is a generic server error.
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        match self {
            Error::Waitlist(WaitlistError::InvalidEmail(_)) => {
                (StatusCode::BAD_REQUEST, ClientError::InvalidEmail)
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, ClientError::ServerError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// The error as the client sees it, the `Display` output is the `error` field of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Invalid email")]
    InvalidEmail,
    #[display("Server error")]
    ServerError,
}
