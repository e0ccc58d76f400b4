//! The wire model (C1, SPEC_FULL.md §4.1): a reversible JSON codec for the
//! envelope and every domain type referenced by a request or response.

pub mod envelope;
pub mod evaluation;
pub mod point;
pub mod primitives;
pub mod query_result;
pub mod submit_errors;
pub mod transaction;

pub use envelope::{
    FaultEnvelope, IncomingEnvelope, MethodName, Mirror, Reflection, RequestEnvelope,
    ResponseEnvelope, SERVICE_NAME,
};
pub use evaluation::{EvaluationFailure, EvaluationResult, ExUnits, ScriptFailure};
pub use point::{Origin, Point, PointOrOrigin, Tip, TipOrOrigin};
pub use primitives::{Digest28, Digest32, Lovelace, LovelaceDelta, Null, Ratio};
pub use query_result::{EraMismatch, QueryOutcome};
pub use submit_errors::SubmitTxError;
pub use transaction::{Block, ByronTransaction, Transaction, TxIn, TxOut};
