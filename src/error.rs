//! The crate-wide error taxonomy (C9, SPEC_FULL.md §4.9, §7).
//!
//! Every fallible public entry point returns [`BridgeResult<T>`]. None of
//! these are retried internally — retrying a `ServerNotReady` or a
//! `SocketClosed` is a decision only the caller can make.

use crate::wire::{Point, SubmitTxError};
use serde_json::Value;
use thiserror::Error;

pub type BridgeResult<T> = Result<T, BridgeError>;

/// A protocol-level fault reported by the bridge itself (a `jsonwsp/fault`
/// frame), as opposed to a domain-level error decoded from a `result`.
#[derive(Debug, Clone, Error)]
#[error("bridge fault {code}: {string}")]
pub struct JsonwspFault {
    pub code: String,
    pub string: String,
}

#[derive(Debug, Error)]
pub enum BridgeError {
    // --- Transport ---
    #[error("socket is closed")]
    SocketClosed,

    #[error("health probe request failed with HTTP status {status}")]
    RequestError { status: u16 },

    #[error("server is not ready: {health:?}")]
    ServerNotReady { health: Value },

    #[error("websocket transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    // --- Envelope ---
    #[error(transparent)]
    JsonwspFault(#[from] JsonwspFault),

    #[error("malformed envelope: {raw}")]
    Malformed { raw: String },

    // --- Correlation ---
    #[error("response matched no known discriminant: {raw}")]
    UnknownResult { raw: Value },

    // --- StateQuery ---
    #[error("query {query} is unavailable in the current era")]
    QueryUnavailableInCurrentEra { query: String },

    #[error("era mismatch on query {query}: query era {query_era}, ledger era {ledger_era}")]
    EraMismatch {
        query: String,
        query_era: String,
        ledger_era: String,
    },

    #[error("acquire point is too old")]
    AcquirePointTooOld,

    #[error("acquire point is not on chain")]
    AcquirePointNotOnChain,

    #[error("acquire failed for an unrecognized reason: {raw}")]
    AcquirePointFailure { raw: Value },

    // --- ChainSync ---
    #[error("no intersection found among the supplied points: {points:?}")]
    IntersectionNotFound { points: Vec<Point> },

    #[error("the chain tip is origin, there is nothing to intersect with")]
    TipIsOrigin,

    // --- TxSubmission ---
    #[error("submitting the transaction failed with {} error(s)", .0.len())]
    SubmitFailed(Vec<SubmitTxError>),

    #[error("evaluating the transaction failed: {0:?}")]
    EvaluationFailed(crate::wire::EvaluationFailure),
}

impl BridgeError {
    /// True for exactly the variants that close the underlying socket as a
    /// side effect of the failure (one-shot acquire failures, per §4.5).
    pub fn closes_socket(&self) -> bool {
        matches!(
            self,
            BridgeError::AcquirePointTooOld
                | BridgeError::AcquirePointNotOnChain
                | BridgeError::AcquirePointFailure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closes_socket_only_for_acquire_failures() {
        assert!(BridgeError::AcquirePointTooOld.closes_socket());
        assert!(!BridgeError::SocketClosed.closes_socket());
    }
}
