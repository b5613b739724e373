//! Decoding failures.
//!
//! None of these reach the caller of the dispatcher as an `Err`; they are
//! folded into a failure [`DecodeResult`](crate::DecodeResult).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No built-in decoder with that name.
    #[error("No '{0}' decoder found")]
    DecoderNotFound(String),

    /// The decoder service answered with a non-success status.
    #[error("Decoder service '{url}' returned status {status}")]
    RemoteDecoderRejected {
        url: String,
        status: u16,
        body: String,
    },

    /// The decoder service could not be reached, timed out, or answered
    /// with something that is not a decode result.
    #[error("Call to decoder service '{url}' failed")]
    RemoteDecoderUnreachable { url: String, reason: String },

    /// A serialized result carried both a value and an error.
    #[error("Decode result carries both a value and an error")]
    ConflictingResult,
}

impl DecodeError {
    pub fn unreachable(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::RemoteDecoderUnreachable {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Supporting detail carried next to the error message.
    pub fn detail(&self) -> Option<&str> {
        match self {
            DecodeError::RemoteDecoderRejected { body, .. } => Some(body),
            DecodeError::RemoteDecoderUnreachable { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
