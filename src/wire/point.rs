//! Point, Tip, and Origin (§3, GLOSSARY).

use serde::{Deserialize, Serialize};

/// A `(slot, header-hash)` pair identifying a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub slot: u64,
    pub hash: String,
}

/// `(slot, header-hash, block-number)`; the chain's latest block from the
/// bridge's view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    pub slot: u64,
    pub hash: String,
    #[serde(rename = "blockNo")]
    pub block_no: u64,
}

/// The distinguished sentinel preceding all points. Encoded on the wire as
/// the bare string `"origin"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin;

const ORIGIN_LITERAL: &str = "origin";

/// A point, or the distinguished origin sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointOrOrigin {
    Origin,
    Point(Point),
}

impl Serialize for PointOrOrigin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PointOrOrigin::Origin => serializer.serialize_str(ORIGIN_LITERAL),
            PointOrOrigin::Point(point) => point.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for PointOrOrigin {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.as_str() == Some(ORIGIN_LITERAL) {
            return Ok(PointOrOrigin::Origin);
        }
        let point: Point = serde_json::from_value(value).map_err(serde::de::Error::custom)?;
        Ok(PointOrOrigin::Point(point))
    }
}

/// A tip, or the distinguished origin sentinel (the chain has no blocks
/// yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipOrOrigin {
    Origin,
    Tip(Tip),
}

impl Serialize for TipOrOrigin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TipOrOrigin::Origin => serializer.serialize_str(ORIGIN_LITERAL),
            TipOrOrigin::Tip(tip) => tip.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TipOrOrigin {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.as_str() == Some(ORIGIN_LITERAL) {
            return Ok(TipOrOrigin::Origin);
        }
        let tip: Tip = serde_json::from_value(value).map_err(serde::de::Error::custom)?;
        Ok(TipOrOrigin::Tip(tip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn point_or_origin_round_trips_origin() {
        let decoded: PointOrOrigin = serde_json::from_value(json!("origin")).unwrap();
        assert_eq!(decoded, PointOrOrigin::Origin);
        assert_eq!(serde_json::to_value(&decoded).unwrap(), json!("origin"));
    }

    #[test]
    fn point_or_origin_round_trips_point() {
        let raw = json!({"slot": 12345, "hash": "aa".repeat(32)});
        let decoded: PointOrOrigin = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(
            decoded,
            PointOrOrigin::Point(Point { slot: 12345, hash: "aa".repeat(32) })
        );
        assert_eq!(serde_json::to_value(&decoded).unwrap(), raw);
    }

    #[test]
    fn tip_or_origin_decodes_tip() {
        let raw = json!({"slot": 100, "hash": "bb".repeat(32), "blockNo": 1});
        let decoded: TipOrOrigin = serde_json::from_value(raw).unwrap();
        assert_eq!(
            decoded,
            TipOrOrigin::Tip(Tip { slot: 100, hash: "bb".repeat(32), block_no: 1 })
        );
    }
}
