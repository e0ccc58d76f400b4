//! `EvaluateTx` result/failure shapes (§4.7).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A `{memory, steps}` pair bounding Plutus script execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExUnits {
    pub memory: u64,
    pub steps: u64,
}

/// Successful evaluation: execution budget per redeemer pointer, e.g.
/// `"spend:0"` or `"mint:1"`.
pub type EvaluationResult = HashMap<String, ExUnits>;

/// One entry of an `EvaluationFailure.ScriptFailures` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScriptFailure {
    ExtraRedeemers(Value),
    IllFormedExecutionBudget(Value),
    MissingRequiredDatums(Value),
    MissingRequiredScripts(Value),
    NoCostModelForLanguage(Value),
    NonScriptInputReferencedByRedeemer(Value),
    UnknownInputReferencedByRedeemer(Value),
    ValidatorFailed(Value),
    Unknown(Value),
}

impl ScriptFailure {
    pub fn from_raw(raw: Value) -> Self {
        serde_json::from_value::<ScriptFailure>(raw.clone()).unwrap_or(ScriptFailure::Unknown(raw))
    }
}

/// Top-level `EvaluateTx` failure sum (§4.7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EvaluationFailure {
    /// Per-redeemer-pointer script failures, keyed the same way as
    /// `EvaluationResult`.
    ScriptFailures(HashMap<String, ScriptFailure>),
    IncompatibleEra(Value),
    AdditionalUtxoOverlap(Value),
    NotEnoughSynced(Value),
    CannotCreateEvaluationContext(Value),
    Unknown(Value),
}

impl EvaluationFailure {
    /// Decode an `EvaluationFailure` payload. `ScriptFailures` is decoded
    /// entry-by-entry through [`ScriptFailure::from_raw`] so a single
    /// unrecognized nested key never poisons the whole map.
    pub fn from_raw(raw: Value) -> Self {
        if let Some(obj) = raw.as_object() {
            if obj.len() == 1 {
                if let Some(script_failures) = obj.get("ScriptFailures") {
                    if let Some(map) = script_failures.as_object() {
                        let decoded = map
                            .iter()
                            .map(|(k, v)| (k.clone(), ScriptFailure::from_raw(v.clone())))
                            .collect();
                        return EvaluationFailure::ScriptFailures(decoded);
                    }
                }
                if let Some(v) = obj.get("IncompatibleEra") {
                    return EvaluationFailure::IncompatibleEra(v.clone());
                }
                if let Some(v) = obj.get("AdditionalUtxoOverlap") {
                    return EvaluationFailure::AdditionalUtxoOverlap(v.clone());
                }
                if let Some(v) = obj.get("NotEnoughSynced") {
                    return EvaluationFailure::NotEnoughSynced(v.clone());
                }
                if let Some(v) = obj.get("CannotCreateEvaluationContext") {
                    return EvaluationFailure::CannotCreateEvaluationContext(v.clone());
                }
            }
        }
        EvaluationFailure::Unknown(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_script_failures_map() {
        let raw = json!({"ScriptFailures": {"spend:0": {"validatorFailed": {"error": "boom", "traces": []}}}});
        let decoded = EvaluationFailure::from_raw(raw);
        match decoded {
            EvaluationFailure::ScriptFailures(map) => {
                assert_eq!(map.len(), 1);
                assert!(matches!(map.get("spend:0"), Some(ScriptFailure::ValidatorFailed(_))));
            }
            other => panic!("expected ScriptFailures, got {other:?}"),
        }
    }

    #[test]
    fn decodes_incompatible_era() {
        let raw = json!({"IncompatibleEra": "Byron"});
        assert_eq!(
            EvaluationFailure::from_raw(raw),
            EvaluationFailure::IncompatibleEra(json!("Byron"))
        );
    }
}
