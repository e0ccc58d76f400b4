//! Per-era transaction and block records (§3).

use super::primitives::{Lovelace, Null};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A transaction input: the hash of the transaction it spends from, and the
/// output index within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxIn {
    pub tx_id: String,
    pub index: u32,
}

/// A transaction output. `datum`/`script` are left as raw JSON — this crate
/// does not interpret script or datum contents, only routes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOut {
    pub address: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum_hash: Option<String>,
}

/// A post-Byron (Shelley-and-later) transaction. Byron transactions are a
/// structurally narrower record (see [`ByronTransaction`]) and are not
/// unified with this type — flattening them into one record with optional
/// fields would hide the era distinction the wire actually makes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    #[serde(default)]
    pub certificates: Vec<Value>,
    #[serde(default)]
    pub withdrawals: Value,
    pub fee: Lovelace,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_interval: Option<Value>,
    pub witness: Value,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Byron era's narrower transaction shape: no certificates, withdrawals,
/// scripts, or metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByronTransaction {
    pub id: String,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub witness: Value,
}

/// The sole recognized key discriminates the era; exactly one of these
/// fields is ever populated by the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EraBlockBody<T> {
    pub body: Vec<T>,
    pub header: Value,
    pub header_hash: String,
}

/// `Block`, a sum over eras (§3, §9 open question 2: discriminated purely
/// by which single key is present, not by an explicit `block_type` field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Byron(EraBlockBody<ByronTransaction>),
    Shelley(EraBlockBody<Transaction>),
    Allegra(EraBlockBody<Transaction>),
    Mary(EraBlockBody<Transaction>),
    Alonzo(EraBlockBody<Transaction>),
    Babbage(EraBlockBody<Transaction>),
}

impl Block {
    /// Decode a block by key-sniffing its sole recognized key.
    ///
    /// Any shape with zero or more than one of the recognized era keys is
    /// rejected as malformed — callers see this surfaced as
    /// [`crate::error::BridgeError::Malformed`].
    pub fn from_raw(raw: &Value) -> Option<Block> {
        let obj = raw.as_object()?;
        let mut matches = obj
            .keys()
            .filter(|k| matches!(k.as_str(), "byron" | "shelley" | "allegra" | "mary" | "alonzo" | "babbage"));
        let key = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        let payload = obj.get(key)?.clone();
        match key.as_str() {
            "byron" => serde_json::from_value(payload).ok().map(Block::Byron),
            "shelley" => serde_json::from_value(payload).ok().map(Block::Shelley),
            "allegra" => serde_json::from_value(payload).ok().map(Block::Allegra),
            "mary" => serde_json::from_value(payload).ok().map(Block::Mary),
            "alonzo" => serde_json::from_value(payload).ok().map(Block::Alonzo),
            "babbage" => serde_json::from_value(payload).ok().map(Block::Babbage),
            _ => None,
        }
    }
}

/// `AuxiliaryData | Null` — present when a transaction carries metadata,
/// `Null` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuxiliaryDataOrNull {
    Data(Value),
    Null(Null),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_block_with_two_era_keys() {
        let raw = json!({"byron": {}, "shelley": {}});
        assert!(Block::from_raw(&raw).is_none());
    }

    #[test]
    fn rejects_block_with_no_era_key() {
        let raw = json!({"somethingElse": {}});
        assert!(Block::from_raw(&raw).is_none());
    }

    #[test]
    fn decodes_shelley_block_by_key() {
        let raw = json!({
            "shelley": {
                "body": [],
                "header": {"slot": 1},
                "headerHash": "aa".repeat(32),
            }
        });
        let block = Block::from_raw(&raw).unwrap();
        assert!(matches!(block, Block::Shelley(_)));
    }

    #[test]
    fn tx_in_round_trips_camel_case_tx_id() {
        let raw = json!({"txId": "aa".repeat(32), "index": 0});
        let decoded: TxIn = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(decoded, TxIn { tx_id: "aa".repeat(32), index: 0 });
        assert_eq!(serde_json::to_value(&decoded).unwrap(), raw);
    }

    #[test]
    fn transaction_round_trips_camel_case_validity_interval() {
        let raw = json!({
            "id": "aa".repeat(32),
            "inputs": [{"txId": "bb".repeat(32), "index": 0}],
            "outputs": [],
            "certificates": [],
            "withdrawals": {},
            "fee": 170000,
            "validityInterval": {"invalidBefore": 1, "invalidHereafter": 2},
            "witness": {},
        });
        let decoded: Transaction = serde_json::from_value(raw.clone()).unwrap();
        assert!(decoded.validity_interval.is_some());
        assert_eq!(serde_json::to_value(&decoded).unwrap()["validityInterval"], raw["validityInterval"]);
    }
}
