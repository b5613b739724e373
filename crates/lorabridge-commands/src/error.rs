//! Error types for MAC commands and downlink requests.

use crate::mac::{Cid, Direction, Operation};

/// MAC command errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MacCommandError {
    /// The variant exists but this operation has no implementation yet.
    #[error("{operation} is not supported for {cid:?} in {direction} direction")]
    Unsupported {
        cid: Cid,
        direction: Direction,
        operation: Operation,
    },

    #[error("Unknown MAC command identifier: 0x{0:02X}")]
    UnknownCid(u8),

    #[error("Truncated {cid:?}: expected {expected} bytes, {available} available")]
    Truncated {
        cid: Cid,
        expected: usize,
        available: usize,
    },

    #[error("Empty MAC command buffer")]
    Empty,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Downlink request errors.
#[derive(Debug, thiserror::Error)]
pub enum DownlinkError {
    #[error("Invalid downlink request: {0}")]
    InvalidRequest(String),

    #[error("Invalid downlink payload: {0}")]
    InvalidPayload(String),

    #[error("Malformed downlink request: {0}")]
    Json(#[from] serde_json::Error),
}
