//! The health gate (C2, SPEC_FULL.md §4.2): one admission probe before a
//! connection is ever opened.

use crate::error::{BridgeError, BridgeResult};
use serde::Deserialize;
use serde_json::Value;

/// The bridge's `/health` response shape. Fields beyond `last_tip_update`
/// aren't interpreted by this crate; `extra` preserves them for callers
/// that want to log or display the full health record.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerHealth {
    #[serde(rename = "lastTipUpdate")]
    pub last_tip_update: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ServerHealth {
    fn is_ready(&self) -> bool {
        !matches!(self.last_tip_update, None | Some(Value::Null))
    }
}

/// Probe `{base}/health` once. Succeeds only when the bridge reports a
/// non-null `lastTipUpdate`; this performs no retry of its own (§4.2 — the
/// gate is advisory, retry policy belongs to the caller).
pub async fn check_health(client: &reqwest::Client, base_url: &str) -> BridgeResult<ServerHealth> {
    let url = format!("{base_url}/health");
    tracing::debug!(url = %url, "probing bridge health");
    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(BridgeError::RequestError { status: status.as_u16() });
    }
    let health: ServerHealth = response.json().await?;
    if health.is_ready() {
        tracing::debug!("bridge is ready");
        Ok(health)
    } else {
        let raw = serde_json::to_value(&health).unwrap_or(Value::Null);
        tracing::warn!(health = %raw, "bridge reported not ready");
        Err(BridgeError::ServerNotReady { health: raw })
    }
}

impl serde::Serialize for ServerHealth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.extra.len() + 1))?;
        map.serialize_entry("lastTipUpdate", &self.last_tip_update)?;
        for (k, v) in &self.extra {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_when_last_tip_update_present() {
        let health: ServerHealth =
            serde_json::from_value(serde_json::json!({"lastTipUpdate": "2023-01-01T00:00:00Z"}))
                .unwrap();
        assert!(health.is_ready());
    }

    #[test]
    fn not_ready_when_last_tip_update_null() {
        let health: ServerHealth =
            serde_json::from_value(serde_json::json!({"lastTipUpdate": null})).unwrap();
        assert!(!health.is_ready());
    }

    #[test]
    fn not_ready_when_last_tip_update_absent() {
        let health: ServerHealth = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(!health.is_ready());
    }
}
