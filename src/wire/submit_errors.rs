//! The closed catalog of `SubmitTx` failure variants (§4.7, §9).
//!
//! Every entry in a `SubmitFail` response is a single-key tagged object; the
//! key selects the variant below. Order in the wire's error list is
//! preserved by the caller (`TxSubmissionEngine::submit_tx`), not by this
//! type itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a `SubmitTx` failure list.
///
/// The variant names mirror the wire's tagged keys (camelCase, via
/// `#[serde(rename_all = "camelCase")]` plus a couple of explicit renames
/// where the Rust identifier can't be a plain camelCase transform of the
/// key). `Unknown` is the forward-compatibility tail for keys not in this
/// catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmitTxError {
    AddressAttributesTooLarge(Value),
    AlreadyDelegating(Value),
    BadInputs(Value),
    CollateralHasNonAdaAssets(Value),
    CollateralIsScript(Value),
    CollateralTooSmall(Value),
    CollectErrors(Value),
    DelegateNotRegistered(Value),
    DuplicateGenesisVrf(Value),
    EraMismatch(Value),
    ExecutionUnitsTooLarge(Value),
    ExpiredUtxo(Value),
    ExtraDataMismatch(Value),
    ExtraRedeemers(Value),
    ExtraScriptWitnesses(Value),
    FeeTooSmall(Value),
    InsufficientFundsForMir(Value),
    InsufficientGenesisSignatures(Value),
    InvalidMetadata(Value),
    InvalidWitnesses(Value),
    MalformedReferenceScripts(Value),
    MalformedScriptWitnesses(Value),
    MirNegativeTransfer(Value),
    MirNegativeTransferNotCurrentlyAllowed(Value),
    MirProducesNegativeUpdate(Value),
    MirTransferNotCurrentlyAllowed(Value),
    MissingAtLeastOneInputUtxo(Value),
    MissingCollateralInputs(Value),
    MissingDatumHashesForInputs(Value),
    MissingRequiredDatums(Value),
    MissingRequiredRedeemers(Value),
    MissingRequiredSignatures(Value),
    MissingScriptWitnesses(Value),
    MissingTxMetadata(Value),
    MissingTxMetadataHash(Value),
    MissingVkWitnesses(Value),
    NetworkMismatch(Value),
    NonGenesisVoters(Value),
    OutputTooSmall(Value),
    OutsideForecast(Value),
    OutsideOfValidityInterval(Value),
    PoolCostTooSmall(Value),
    PoolMetadataHashTooBig(Value),
    ProtocolVersionCannotFollow(Value),
    RewardAccountNotEmpty(Value),
    RewardAccountNotExisting(Value),
    ScriptWitnessNotValidating(Value),
    StakeKeyAlreadyRegistered(Value),
    StakeKeyNotRegistered(Value),
    StakePoolNotRegistered(Value),
    TooLateForMir(Value),
    TooManyAssetsInOutput(Value),
    TooManyCollateralInputs(Value),
    TotalCollateralMismatch(Value),
    TriesToForgeAda(Value),
    TxMetadataHashMismatch(Value),
    TxTooLarge(Value),
    UnknownGenesisKey(Value),
    UnknownOrIncompleteWithdrawals(Value),
    UnspendableDatums(Value),
    UnspendableScriptInputs(Value),
    UpdateWrongEpoch(Value),
    ValidationTagMismatch(Value),
    ValueNotConserved(Value),
    WrongCertificateType(Value),
    WrongPoolCertificate(Value),
    WrongRetirementEpoch(Value),
    /// Forward-compatibility tail: a single-key object whose key is not in
    /// this catalog. Carries the raw `{key: value}` pair so callers can at
    /// least inspect it.
    Unknown(Value),
}

impl SubmitTxError {
    /// Decode one error-list entry, falling back to `Unknown` for anything
    /// that doesn't match a single recognized key.
    pub fn from_raw(raw: Value) -> Self {
        match serde_json::from_value::<SubmitTxError>(raw.clone()) {
            Ok(known) => known,
            Err(_) => SubmitTxError::Unknown(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_fee_too_small() {
        let raw = json!({"feeTooSmall": {"requiredFee": 170000, "actualFee": 160000}});
        let decoded = SubmitTxError::from_raw(raw);
        assert_eq!(
            decoded,
            SubmitTxError::FeeTooSmall(json!({"requiredFee": 170000, "actualFee": 160000}))
        );
    }

    #[test]
    fn decodes_invalid_witnesses() {
        let raw = json!({"invalidWitnesses": ["aa"]});
        let decoded = SubmitTxError::from_raw(raw);
        assert_eq!(
            decoded,
            SubmitTxError::InvalidWitnesses(json!(["aa"]))
        );
    }

    #[test]
    fn unrecognized_key_falls_back_to_unknown() {
        let raw = json!({"somethingNewTheClientHasNeverSeen": {"a": 1}});
        let decoded = SubmitTxError::from_raw(raw.clone());
        assert_eq!(decoded, SubmitTxError::Unknown(raw));
    }

    #[test]
    fn preserves_order_of_a_decoded_list() {
        let raw = json!([
            {"invalidWitnesses": ["aa"]},
            {"feeTooSmall": {"requiredFee": 170000, "actualFee": 160000}}
        ]);
        let list: Vec<Value> = serde_json::from_value(raw).unwrap();
        let decoded: Vec<SubmitTxError> =
            list.into_iter().map(SubmitTxError::from_raw).collect();
        assert_eq!(
            decoded,
            vec![
                SubmitTxError::InvalidWitnesses(json!(["aa"])),
                SubmitTxError::FeeTooSmall(json!({"requiredFee": 170000, "actualFee": 160000})),
            ]
        );
    }
}
