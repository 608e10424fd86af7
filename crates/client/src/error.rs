//! Client-facing error types.

use std::collections::BTreeMap;

use thiserror::Error;

use stockia_core::FieldError;

use crate::api::ApiError;
use crate::session::Unauthenticated;

/// Why a movement submission failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("network error: {0}")]
    Network(String),
    #[error("movement rejected: {}", .message.as_deref().unwrap_or("invalid fields"))]
    Validation {
        message: Option<String>,
        fields: BTreeMap<String, String>,
    },
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("not signed in")]
    Unauthenticated,
    #[error("a movement for this product is already being submitted")]
    InFlight,
    #[error("unreadable server response: {0}")]
    Decode(String),
    /// The server accepted the movement but its reply was unusable. `stock`
    /// is the reloaded server stock, `None` if the product is now stale.
    #[error("movement sent but not confirmed")]
    Unconfirmed { stock: Option<u32> },
}

impl SubmissionError {
    /// Text for the user: the server's own message when it sent one,
    /// a generic notice otherwise.
    pub fn user_message(&self) -> String {
        let server_text = |m: &str| Some(m.trim().to_string()).filter(|m| !m.is_empty());

        match self {
            SubmissionError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            SubmissionError::Validation { message, fields } => message
                .as_deref()
                .and_then(server_text)
                .or_else(|| fields.values().next().and_then(|m| server_text(m.as_str())))
                .unwrap_or_else(|| "The server rejected the movement.".to_string()),
            SubmissionError::Server { message, .. } => server_text(message.as_str()).unwrap_or_else(|| {
                "The server could not record the movement. Try again later.".to_string()
            }),
            SubmissionError::Unauthenticated => {
                "Your session has expired. Sign in again.".to_string()
            }
            SubmissionError::InFlight => {
                "A movement for this product is still being saved. Wait for it to finish."
                    .to_string()
            }
            SubmissionError::Decode(_) => {
                "The server sent an unexpected response. Reload the product to check its stock."
                    .to_string()
            }
            SubmissionError::Unconfirmed { stock: Some(stock) } => format!(
                "The movement was sent but the server's reply could not be read. \
                 Current stock is {stock}; check it before submitting again."
            ),
            SubmissionError::Unconfirmed { stock: None } => {
                "The movement was sent but could not be confirmed. \
                 Reload the product before submitting again."
                    .to_string()
            }
        }
    }
}

impl From<Unauthenticated> for SubmissionError {
    fn from(_: Unauthenticated) -> Self {
        SubmissionError::Unauthenticated
    }
}

impl From<ApiError> for SubmissionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(m) => SubmissionError::Network(m),
            ApiError::Validation { message, fields } => SubmissionError::Validation {
                message: Some(message),
                fields,
            },
            ApiError::Unauthorized { status: 401, .. } => SubmissionError::Unauthenticated,
            ApiError::Unauthorized { status, message } | ApiError::Server { status, message } => {
                SubmissionError::Server { status, message }
            }
            ApiError::Decode(m) => SubmissionError::Decode(m),
            ApiError::Unconfirmed(_) => SubmissionError::Unconfirmed { stock: None },
        }
    }
}

/// Errors of the non-submission context operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Unauthenticated(#[from] Unauthenticated),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{} invalid field(s)", .0.len())]
    InvalidForm(Vec<FieldError>),
    #[error("product load was superseded by a newer request")]
    Superseded,
}
