//! The `StateQuery` result sum and the `root`/`__root__` wrapper
//! canonicalization (§4.5, §9 open questions 1 and 3).

use serde_json::Value;

/// `{eraMismatch: {queryEra, ledgerEra}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct EraMismatch {
    pub query_era: String,
    pub ledger_era: String,
}

const QUERY_UNAVAILABLE_LITERAL: &str = "QueryUnavailableInCurrentEra";

/// The generic result sum every `StateQuery` query returns (§4.5):
/// a successful value, an era mismatch, the bridge's
/// query-unavailable-in-this-era sentinel, or something this crate doesn't
/// recognize.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Success(Value),
    EraMismatch(EraMismatch),
    QueryUnavailableInCurrentEra,
    Unknown(Value),
}

/// Strip a `{root: x}` or `{__root__: x}` single-field wrapper down to its
/// inner value (§9 open question 1). Legacy `__root__` wrappers are
/// accepted here but never re-emitted — this crate has no encode path for
/// query results, only decode.
fn unwrap_root(value: Value) -> Value {
    if let Some(obj) = value.as_object() {
        if obj.len() == 1 {
            if let Some(inner) = obj.get("root") {
                return inner.clone();
            }
            if let Some(inner) = obj.get("__root__") {
                return inner.clone();
            }
        }
    }
    value
}

impl QueryOutcome {
    /// Classify a raw `result` payload into the outcome sum.
    ///
    /// `QueryUnavailableInCurrentEra` is accepted both as the bare string
    /// and wrapped in `{root: ...}` (§9 open question 3) — both forms are
    /// normalized to the same `QueryOutcome::QueryUnavailableInCurrentEra`.
    pub fn from_raw(raw: Value) -> Self {
        let unwrapped = unwrap_root(raw.clone());
        if unwrapped.as_str() == Some(QUERY_UNAVAILABLE_LITERAL) {
            return QueryOutcome::QueryUnavailableInCurrentEra;
        }
        if let Some(obj) = unwrapped.as_object() {
            if obj.len() == 1 {
                if let Some(era_mismatch) = obj.get("eraMismatch") {
                    if let (Some(query_era), Some(ledger_era)) = (
                        era_mismatch.get("queryEra").and_then(Value::as_str),
                        era_mismatch.get("ledgerEra").and_then(Value::as_str),
                    ) {
                        return QueryOutcome::EraMismatch(EraMismatch {
                            query_era: query_era.to_string(),
                            ledger_era: ledger_era.to_string(),
                        });
                    }
                }
            }
        }
        // A bare empty object/array is a valid successful empty result for
        // mapping-shaped queries (§9 open question 4), not `Unknown` — it
        // falls through to `Success` here like any other well-formed value.
        QueryOutcome::Success(unwrapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_string_unavailable() {
        let raw = json!("QueryUnavailableInCurrentEra");
        assert_eq!(QueryOutcome::from_raw(raw), QueryOutcome::QueryUnavailableInCurrentEra);
    }

    #[test]
    fn root_wrapped_unavailable() {
        let raw = json!({"root": "QueryUnavailableInCurrentEra"});
        assert_eq!(QueryOutcome::from_raw(raw), QueryOutcome::QueryUnavailableInCurrentEra);
    }

    #[test]
    fn legacy_dunder_root_wrapped_unavailable() {
        let raw = json!({"__root__": "QueryUnavailableInCurrentEra"});
        assert_eq!(QueryOutcome::from_raw(raw), QueryOutcome::QueryUnavailableInCurrentEra);
    }

    #[test]
    fn era_mismatch() {
        let raw = json!({"eraMismatch": {"queryEra": "Byron", "ledgerEra": "Mary"}});
        assert_eq!(
            QueryOutcome::from_raw(raw),
            QueryOutcome::EraMismatch(EraMismatch {
                query_era: "Byron".into(),
                ledger_era: "Mary".into(),
            })
        );
    }

    #[test]
    fn empty_map_is_a_successful_empty_result() {
        let raw = json!({});
        assert_eq!(QueryOutcome::from_raw(raw), QueryOutcome::Success(json!({})));
    }
}
