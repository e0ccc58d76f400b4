//! A client library for a bridge service fronting a Cardano node, speaking
//! ChainSync, StateQuery, TxSubmission and TxMonitor over one bidirectional
//! WebSocket using a JSON-RPC-like envelope.
//!
//! `InteractionContext::new` is the entry point: it runs the health gate,
//! opens the connection, and hands back a context each engine borrows.

pub mod chain_sync;
pub mod config;
pub mod connection;
pub mod correlator;
pub mod error;
pub mod health;
pub mod state_query;
pub mod tx_monitor;
pub mod tx_submission;
pub mod wire;

pub use chain_sync::{ChainSyncEngine, ChainSyncHandler, IntersectionResult, RequestNextToken, RollEvent};
pub use config::{ConnectionConfig, InteractionType, LogLevel};
pub use connection::InteractionContext;
pub use error::{BridgeError, BridgeResult};
pub use health::ServerHealth;
pub use state_query::{QueryState, StateQueryEngine};
pub use tx_monitor::{MonitorState, TxMonitorEngine};
pub use tx_submission::TxSubmissionEngine;
