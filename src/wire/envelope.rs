//! The JSON-RPC-like envelope (§3, §6.2) every frame on the wire is wrapped
//! in.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The bridge's service name, always the literal `"ogmios"` on the wire.
/// This is a wire-compatibility constant, not a crate name choice.
pub const SERVICE_NAME: &str = "ogmios";

pub const WIRE_VERSION: &str = "1.0";

/// The closed set of method names (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodName {
    RequestNext,
    FindIntersect,
    SubmitTx,
    EvaluateTx,
    Acquire,
    Release,
    AwaitAcquire,
    NextTx,
    HasTx,
    SizeAndCapacity,
    ReleaseMempool,
    Query,
}

impl MethodName {
    pub fn as_str(self) -> &'static str {
        match self {
            MethodName::RequestNext => "RequestNext",
            MethodName::FindIntersect => "FindIntersect",
            MethodName::SubmitTx => "SubmitTx",
            MethodName::EvaluateTx => "EvaluateTx",
            MethodName::Acquire => "Acquire",
            MethodName::Release => "Release",
            MethodName::AwaitAcquire => "AwaitAcquire",
            MethodName::NextTx => "NextTx",
            MethodName::HasTx => "HasTx",
            MethodName::SizeAndCapacity => "SizeAndCapacity",
            MethodName::ReleaseMempool => "ReleaseMempool",
            MethodName::Query => "Query",
        }
    }
}

/// The correlation field attached to outgoing requests. The correlator
/// always sets `request_id`; callers may merge in additional fields via
/// `extra`, but `request_id` always wins (§4.4 step 2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mirror {
    #[serde(rename = "requestId")]
    pub request_id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// The corresponding field echoed back on responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reflection {
    #[serde(rename = "requestId")]
    pub request_id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// An outgoing request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: &'static str,
    pub servicename: &'static str,
    pub methodname: MethodName,
    pub args: Value,
    pub mirror: Mirror,
}

impl RequestEnvelope {
    pub fn new(methodname: MethodName, args: Value, request_id: String) -> Self {
        RequestEnvelope {
            kind: "jsonwsp/request",
            version: WIRE_VERSION,
            servicename: SERVICE_NAME,
            methodname,
            args,
            mirror: Mirror { request_id, extra: Default::default() },
        }
    }
}

/// An incoming frame: either a successful response or a protocol fault.
/// Decoding inspects `type` to select the branch.
#[derive(Debug, Clone)]
pub enum IncomingEnvelope {
    Response(ResponseEnvelope),
    Fault(FaultEnvelope),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    pub methodname: MethodName,
    pub result: Value,
    pub reflection: Reflection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fault {
    pub code: String,
    pub string: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaultEnvelope {
    pub methodname: Option<MethodName>,
    pub fault: Fault,
    #[serde(default)]
    pub reflection: Option<Reflection>,
}

impl IncomingEnvelope {
    /// Parse a raw text frame into a response or fault envelope.
    ///
    /// Returns `None` for anything that isn't a well-formed
    /// `jsonwsp/response` or `jsonwsp/fault` frame — the caller surfaces
    /// that as [`crate::error::BridgeError::Malformed`].
    pub fn parse(raw: &str) -> Option<IncomingEnvelope> {
        let value: Value = serde_json::from_str(raw).ok()?;
        let kind = value.get("type")?.as_str()?;
        match kind {
            "jsonwsp/response" => {
                serde_json::from_value(value).ok().map(IncomingEnvelope::Response)
            }
            "jsonwsp/fault" => serde_json::from_value(value).ok().map(IncomingEnvelope::Fault),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_envelope_serializes_mirror_request_id() {
        let env = RequestEnvelope::new(MethodName::Query, json!({"query": "chainTip"}), "abc12".into());
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["mirror"]["requestId"], "abc12");
        assert_eq!(value["servicename"], "ogmios");
        assert_eq!(value["type"], "jsonwsp/request");
    }

    #[test]
    fn parses_response_envelope() {
        let raw = json!({
            "type": "jsonwsp/response",
            "version": "1.0",
            "servicename": "ogmios",
            "methodname": "Query",
            "result": {"slot": 1},
            "reflection": {"requestId": "abc12"}
        })
        .to_string();
        match IncomingEnvelope::parse(&raw) {
            Some(IncomingEnvelope::Response(resp)) => {
                assert_eq!(resp.reflection.request_id, "abc12");
            }
            other => panic!("expected response envelope, got {other:?}"),
        }
    }

    #[test]
    fn parses_fault_envelope() {
        let raw = json!({
            "type": "jsonwsp/fault",
            "version": "1.0",
            "servicename": "ogmios",
            "methodname": "Query",
            "fault": {"code": "client", "string": "bad request"}
        })
        .to_string();
        match IncomingEnvelope::parse(&raw) {
            Some(IncomingEnvelope::Fault(f)) => {
                assert_eq!(f.fault.code, "client");
            }
            other => panic!("expected fault envelope, got {other:?}"),
        }
    }

    #[test]
    fn parse_returns_none_for_unrecognized_type() {
        let raw = json!({"type": "something-else"}).to_string();
        assert!(IncomingEnvelope::parse(&raw).is_none());
    }
}
