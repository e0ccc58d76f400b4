//! Connection lifecycle (C3, SPEC_FULL.md §4.3).

use crate::config::{ConnectionConfig, InteractionType};
use crate::correlator::Correlator;
use crate::error::BridgeResult;
use crate::health;
use crate::wire::MethodName;
use serde_json::Value;
use std::sync::Arc;
use tokio_tungstenite::connect_async;

/// Owns the socket and the correlator for one session. Created once, borrowed
/// by every engine, dropped when the user shuts it down or the socket
/// closes (§3 Lifecycle).
pub struct InteractionContext {
    pub config: ConnectionConfig,
    correlator: Arc<Correlator>,
}

impl InteractionContext {
    /// Runs the health gate, then opens the WebSocket. Fails with
    /// `ServerNotReady` if the gate rejects; the constructor awaits the full
    /// handshake before returning (§4.3 — opens synchronously from the
    /// caller's perspective).
    pub async fn new(config: ConnectionConfig) -> BridgeResult<InteractionContext> {
        let http_client = reqwest::Client::new();
        health::check_health(&http_client, &config.http_base_url()).await?;

        let ws_url = config.ws_url();
        tracing::debug!(url = %ws_url, "opening bridge connection");
        let (stream, _response) = connect_async(&ws_url).await?;
        let correlator = Correlator::spawn(stream);

        Ok(InteractionContext { config, correlator })
    }

    pub(crate) fn correlator(&self) -> &Arc<Correlator> {
        &self.correlator
    }

    /// Send one request through the correlator, then apply the `afterEach`
    /// policy (§4.3, §4.4 step 6): `OneTime` closes the socket after every
    /// completed request, `LongRunning` leaves it open.
    pub(crate) async fn send(&self, methodname: MethodName, args: Value) -> BridgeResult<Value> {
        let result = self.correlator.send(methodname, args).await;
        if self.config.interaction_type == InteractionType::OneTime {
            if let Err(close_err) = self.correlator.close().await {
                tracing::warn!(%close_err, "error closing socket after one-time interaction");
            }
        }
        result
    }

    /// Idempotent shutdown: repeated calls never panic; subsequent
    /// operations fail with `SocketClosed` (§8 invariant 7).
    pub async fn shutdown(&self) -> BridgeResult<()> {
        if self.correlator.is_closed() {
            return Ok(());
        }
        self.correlator.close().await
    }

    pub fn is_closed(&self) -> bool {
        self.correlator.is_closed()
    }
}
