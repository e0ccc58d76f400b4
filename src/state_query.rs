//! The StateQuery engine (C5, SPEC_FULL.md §4.5).
//!
//! Mirrors the source's `state_query_client.py`: a flat method surface over
//! `Query`, plus the acquire/release state machine gating it.

use crate::connection::InteractionContext;
use crate::error::{BridgeError, BridgeResult};
use crate::wire::{MethodName, PointOrOrigin, QueryOutcome};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-context acquire/release state (§4.5). `Idle` vs `Acquired` is the
/// only externally visible distinction; `Acquiring` is transient within
/// `acquire()` itself, so it isn't represented as a stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Acquired,
}

/// Typed dispatch over the bridge's `Query` method, gated by an optional
/// acquired ledger point.
pub struct StateQueryEngine<'a> {
    context: &'a InteractionContext,
    acquired: AtomicBool,
}

impl<'a> StateQueryEngine<'a> {
    pub fn new(context: &'a InteractionContext) -> Self {
        StateQueryEngine { context, acquired: AtomicBool::new(false) }
    }

    pub fn state(&self) -> QueryState {
        if self.acquired.load(Ordering::SeqCst) {
            QueryState::Acquired
        } else {
            QueryState::Idle
        }
    }

    /// `Idle -> Acquiring -> Acquired` on success, `Idle -> Acquiring ->
    /// Idle` (socket closed) on failure (§4.5).
    pub async fn acquire(&self, point: Option<PointOrOrigin>) -> BridgeResult<()> {
        let args = match point {
            Some(p) => json!({ "point": p }),
            None => json!({}),
        };
        match self.context.send(MethodName::Acquire, args).await {
            Ok(result) => {
                if result.get("AcquireSuccess").is_some() {
                    self.acquired.store(true, Ordering::SeqCst);
                    Ok(())
                } else {
                    self.fail_acquire(result).await
                }
            }
            Err(err) => Err(err),
        }
    }

    /// `AwaitAcquire` blocks until the point becomes available (a future
    /// slot), otherwise behaves identically to `acquire` (§4.5).
    pub async fn await_acquire(&self, point: Option<PointOrOrigin>) -> BridgeResult<()> {
        let args = match point {
            Some(p) => json!({ "point": p }),
            None => json!({}),
        };
        match self.context.send(MethodName::AwaitAcquire, args).await {
            Ok(result) => {
                if result.get("AcquireSuccess").is_some() {
                    self.acquired.store(true, Ordering::SeqCst);
                    Ok(())
                } else {
                    self.fail_acquire(result).await
                }
            }
            Err(err) => Err(err),
        }
    }

    /// On any acquire failure, the socket closes (one-shot policy) and the
    /// specific typed error surfaces: `AcquirePointTooOld`,
    /// `AcquirePointNotOnChain`, or — for anything else — `AcquirePointFailure{raw}`.
    /// This is a deliberate departure from the source, which collapses
    /// unrecognized failures into a single generic `RequestError`; the spec
    /// calls for the raw payload to be preserved instead (see DESIGN.md).
    async fn fail_acquire(&self, result: Value) -> BridgeResult<()> {
        let _ = self.context.shutdown().await;
        let failure = result.get("AcquireFailure").cloned().unwrap_or(result);
        let reason = failure.get("failure").and_then(Value::as_str).unwrap_or("");
        match reason {
            "pointTooOld" => Err(BridgeError::AcquirePointTooOld),
            "pointNotOnChain" => Err(BridgeError::AcquirePointNotOnChain),
            _ => Err(BridgeError::AcquirePointFailure { raw: failure }),
        }
    }

    pub async fn release(&self) -> BridgeResult<()> {
        self.context.send(MethodName::Release, json!({})).await?;
        self.acquired.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Dispatch a named query through `Query`, classify the result via
    /// [`QueryOutcome`], and translate it into the typed success/error
    /// split per §4.5's policy table.
    async fn query(&self, name: &str, params: Value) -> BridgeResult<Value> {
        let args = if params.is_null() {
            json!({ "query": name })
        } else {
            let mut inner = serde_json::Map::new();
            inner.insert(name.to_string(), params);
            json!({ "query": Value::Object(inner) })
        };
        let result = self.context.send(MethodName::Query, args).await?;
        match QueryOutcome::from_raw(result) {
            QueryOutcome::Success(value) => Ok(value),
            QueryOutcome::EraMismatch(mismatch) => Err(BridgeError::EraMismatch {
                query: name.to_string(),
                query_era: mismatch.query_era,
                ledger_era: mismatch.ledger_era,
            }),
            QueryOutcome::QueryUnavailableInCurrentEra => {
                Err(BridgeError::QueryUnavailableInCurrentEra { query: name.to_string() })
            }
            QueryOutcome::Unknown(raw) => Err(BridgeError::UnknownResult { raw }),
        }
    }

    pub async fn block_height(&self) -> BridgeResult<Value> {
        self.query("blockHeight", Value::Null).await
    }

    pub async fn chain_tip(&self) -> BridgeResult<Value> {
        self.query("chainTip", Value::Null).await
    }

    pub async fn current_epoch(&self) -> BridgeResult<Value> {
        self.query("currentEpoch", Value::Null).await
    }

    pub async fn current_protocol_parameters(&self) -> BridgeResult<Value> {
        self.query("currentProtocolParameters", Value::Null).await
    }

    pub async fn delegations_and_rewards(&self, stake_key_hashes: &[String]) -> BridgeResult<Value> {
        self.query("delegationsAndRewards", json!(stake_key_hashes)).await
    }

    pub async fn era_start(&self) -> BridgeResult<Value> {
        self.query("eraStart", Value::Null).await
    }

    pub async fn era_summaries(&self) -> BridgeResult<Value> {
        self.query("eraSummaries", Value::Null).await
    }

    pub async fn genesis_config(&self, era: &str) -> BridgeResult<Value> {
        self.query("genesisConfig", json!(era)).await
    }

    pub async fn ledger_tip(&self) -> BridgeResult<Value> {
        self.query("ledgerTip", Value::Null).await
    }

    pub async fn non_myopic_member_rewards(&self, inputs: Value) -> BridgeResult<Value> {
        self.query("nonMyopicMemberRewards", inputs).await
    }

    pub async fn pool_ids(&self) -> BridgeResult<Value> {
        self.query("poolIds", Value::Null).await
    }

    pub async fn pool_parameters(&self, pool_ids: &[String]) -> BridgeResult<Value> {
        self.query("poolParameters", json!(pool_ids)).await
    }

    pub async fn pools_ranking(&self) -> BridgeResult<Value> {
        self.query("poolsRanking", Value::Null).await
    }

    pub async fn proposed_protocol_parameters(&self) -> BridgeResult<Value> {
        self.query("proposedProtocolParameters", Value::Null).await
    }

    pub async fn rewards_provenance(&self) -> BridgeResult<Value> {
        self.query("rewardsProvenance", Value::Null).await
    }

    pub async fn rewards_provenance_new(&self) -> BridgeResult<Value> {
        self.query("rewardsProvenance'", Value::Null).await
    }

    pub async fn stake_distribution(&self) -> BridgeResult<Value> {
        self.query("stakeDistribution", Value::Null).await
    }

    pub async fn system_start(&self) -> BridgeResult<Value> {
        self.query("systemStart", Value::Null).await
    }

    pub async fn utxo(&self, filters: Option<Value>) -> BridgeResult<Value> {
        self.query("utxo", filters.unwrap_or(Value::Null)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::EraMismatch as WireEraMismatch;

    #[test]
    fn era_mismatch_outcome_maps_to_typed_error() {
        let raw = json!({"eraMismatch": {"queryEra": "Byron", "ledgerEra": "Mary"}});
        let outcome = QueryOutcome::from_raw(raw);
        assert_eq!(
            outcome,
            QueryOutcome::EraMismatch(WireEraMismatch {
                query_era: "Byron".into(),
                ledger_era: "Mary".into(),
            })
        );
    }
}
