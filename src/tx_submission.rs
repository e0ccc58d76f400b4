//! The TxSubmission engine (C7, SPEC_FULL.md §4.7).

use crate::connection::InteractionContext;
use crate::error::{BridgeError, BridgeResult};
use crate::wire::{EvaluationFailure, EvaluationResult, MethodName, SubmitTxError};
use serde_json::{json, Value};

pub struct TxSubmissionEngine<'a> {
    context: &'a InteractionContext,
}

impl<'a> TxSubmissionEngine<'a> {
    pub fn new(context: &'a InteractionContext) -> Self {
        TxSubmissionEngine { context }
    }

    /// Submit a CBOR-hex-encoded transaction. On success yields the
    /// transaction hash; on failure yields the full ordered list of typed
    /// errors (§4.7 — ordering is the bridge's and is preserved here).
    pub async fn submit_tx(&self, cbor_hex: &str) -> BridgeResult<String> {
        let args = json!({ "submit": cbor_hex });
        let result = self.context.send(MethodName::SubmitTx, args).await?;

        if let Some(success) = result.get("SubmitSuccess") {
            let tx_id = success
                .get("txId")
                .and_then(Value::as_str)
                .ok_or_else(|| BridgeError::Malformed { raw: result.to_string() })?;
            return Ok(tx_id.to_string());
        }
        if let Some(fail) = result.get("SubmitFail") {
            let entries = fail.as_array().cloned().unwrap_or_default();
            let errors: Vec<SubmitTxError> =
                entries.into_iter().map(SubmitTxError::from_raw).collect();
            return Err(BridgeError::SubmitFailed(errors));
        }
        Err(BridgeError::UnknownResult { raw: result })
    }

    /// Evaluate a CBOR-hex-encoded transaction against an optional
    /// additional UTxO set. Mirrors `evaluate_tx.py`'s request shape: the
    /// `additionalUtxoSet` key is present only when the caller supplies one.
    pub async fn evaluate_tx(
        &self,
        cbor_hex: &str,
        additional_utxo_set: Option<Value>,
    ) -> BridgeResult<EvaluationResult> {
        let mut args = serde_json::Map::new();
        if let Some(utxo) = additional_utxo_set {
            args.insert("additionalUtxoSet".to_string(), utxo);
        }
        args.insert("evaluate".to_string(), json!(cbor_hex));

        let result = self.context.send(MethodName::EvaluateTx, Value::Object(args)).await?;

        if let Some(success) = result.get("EvaluationResult") {
            let decoded: EvaluationResult = serde_json::from_value(success.clone())
                .map_err(|_| BridgeError::Malformed { raw: result.to_string() })?;
            return Ok(decoded);
        }
        if let Some(failure) = result.get("EvaluationFailure") {
            return Err(BridgeError::EvaluationFailed(EvaluationFailure::from_raw(failure.clone())));
        }
        Err(BridgeError::UnknownResult { raw: result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_ordered_submit_failure_list() {
        let raw = json!([
            {"invalidWitnesses": ["aa"]},
            {"feeTooSmall": {"requiredFee": 170000, "actualFee": 160000}}
        ]);
        let entries = raw.as_array().cloned().unwrap();
        let decoded: Vec<SubmitTxError> = entries.into_iter().map(SubmitTxError::from_raw).collect();
        assert_eq!(
            decoded,
            vec![
                SubmitTxError::InvalidWitnesses(json!(["aa"])),
                SubmitTxError::FeeTooSmall(json!({"requiredFee": 170000, "actualFee": 160000})),
            ]
        );
    }
}
