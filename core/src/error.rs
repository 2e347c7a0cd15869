use thiserror::Error;

use crate::types::Tick;

/// A client message that could not be understood.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("message has no type")]
    MissingType,
    #[error("unknown message type {0:?}")]
    UnknownType(String),
    #[error("unknown input action {0:?}")]
    UnknownAction(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("input at tick {tick} comes before an input at tick {previous}")]
    OutOfOrder { tick: Tick, previous: Tick },
    #[error("transcript has inputs up to tick {last} but replay stops at {ticks}")]
    TooShort { last: Tick, ticks: Tick },
    #[error("state digest mismatch after {ticks} ticks")]
    DigestMismatch { ticks: Tick },
}
