//! The request/response correlator (C4, SPEC_FULL.md §4.4).
//!
//! Owns the split WebSocket halves: a reader task demultiplexes inbound
//! frames to single-shot waiters or the ChainSync streaming sink, while
//! outgoing writes are serialized through a mutex-guarded sink. This is the
//! same connect → split → dispatch-loop shape the rest of the pack uses for
//! an outbound WebSocket client (the teacher itself only ever terminates
//! WebSocket connections server-side via axum).

use crate::error::{BridgeError, BridgeResult, JsonwspFault};
use crate::wire::{IncomingEnvelope, MethodName, RequestEnvelope, ResponseEnvelope};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WriteHalf = SplitSink<WsStream, Message>;

/// The 64-symbol alphabet request IDs are drawn from (§4.4 step 1).
const ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+_";

fn generate_request_id() -> String {
    let mut rng = rand::thread_rng();
    (0..10).map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char).collect()
}

type Waiter = oneshot::Sender<BridgeResult<Value>>;

/// Demultiplexes one WebSocket connection among many in-flight requests and
/// the ChainSync streaming sink.
pub struct Correlator {
    write: Mutex<WriteHalf>,
    waiters: Mutex<HashMap<String, Waiter>>,
    chain_sync_sink: Mutex<Option<mpsc::UnboundedSender<ResponseEnvelope>>>,
    closed: AtomicBool,
}

impl Correlator {
    /// Split the stream and spawn the reader task. Returns the correlator
    /// the rest of the context drives `send` through.
    pub fn spawn(stream: WsStream) -> Arc<Correlator> {
        let (write, mut read) = stream.split();
        let correlator = Arc::new(Correlator {
            write: Mutex::new(write),
            waiters: Mutex::new(HashMap::new()),
            chain_sync_sink: Mutex::new(None),
            closed: AtomicBool::new(false),
        });

        let reader_handle = Arc::clone(&correlator);
        tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Text(text)) => reader_handle.dispatch_incoming(&text).await,
                    Ok(Message::Close(_)) => {
                        tracing::debug!("bridge closed the websocket");
                        break;
                    }
                    Ok(_) => {}
                    Err(error) => {
                        tracing::error!(%error, "websocket read error");
                        break;
                    }
                }
            }
            reader_handle.closed.store(true, Ordering::SeqCst);
            reader_handle.fail_all_waiters(BridgeError::SocketClosed).await;
        });

        correlator
    }

    async fn fail_all_waiters(&self, _reason: BridgeError) {
        let mut waiters = self.waiters.lock().await;
        for (_, waiter) in waiters.drain() {
            let _ = waiter.send(Err(BridgeError::SocketClosed));
        }
    }

    /// Register the sink every unsolicited `RequestNext` response is routed
    /// to. Only `RequestNext` streams (§4.4 step 5); every other method
    /// name goes through a one-shot waiter.
    pub async fn register_chain_sync_sink(&self) -> mpsc::UnboundedReceiver<ResponseEnvelope> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.chain_sync_sink.lock().await = Some(tx);
        rx
    }

    async fn dispatch_incoming(&self, raw: &str) {
        let Some(envelope) = IncomingEnvelope::parse(raw) else {
            tracing::error!(raw, "received a malformed envelope");
            return;
        };
        match envelope {
            IncomingEnvelope::Fault(fault) => {
                let request_id = fault.reflection.as_ref().map(|r| r.request_id.clone());
                let err = JsonwspFault { code: fault.fault.code, string: fault.fault.string };
                if let Some(id) = request_id {
                    if let Some(waiter) = self.waiters.lock().await.remove(&id) {
                        let _ = waiter.send(Err(BridgeError::JsonwspFault(err)));
                        return;
                    }
                }
                tracing::warn!(?err, "fault matched no registered waiter, discarding");
            }
            IncomingEnvelope::Response(response) => {
                let id = response.reflection.request_id.clone();
                let mut waiters = self.waiters.lock().await;
                if let Some(waiter) = waiters.remove(&id) {
                    drop(waiters);
                    let _ = waiter.send(Ok(response.result));
                    return;
                }
                drop(waiters);
                if response.methodname == MethodName::RequestNext {
                    let sink = self.chain_sync_sink.lock().await;
                    if let Some(sink) = sink.as_ref() {
                        if sink.send(response).is_err() {
                            tracing::warn!("chain sync sink dropped, discarding RequestNext response");
                        }
                        return;
                    }
                }
                tracing::warn!(request_id = %id, "response matched no registered waiter, discarding");
            }
        }
    }

    /// Send one request and await its correlated response (§4.4).
    ///
    /// Dropping the returned future before it resolves deregisters the
    /// waiter (the `oneshot::Receiver` is dropped with it); any later
    /// arrival for that ID is logged and discarded by the reader task.
    pub async fn send(&self, methodname: MethodName, args: Value) -> BridgeResult<Value> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BridgeError::SocketClosed);
        }
        let request_id = generate_request_id();
        let body = Self::encode(methodname, args, &request_id)?;

        let (tx, rx) = oneshot::channel();
        self.waiters.lock().await.insert(request_id.clone(), tx);

        tracing::debug!(method = methodname.as_str(), request_id = %request_id, "sending request");
        if let Err(error) = self.write.lock().await.send(Message::Text(body)).await {
            self.waiters.lock().await.remove(&request_id);
            return Err(error.into());
        }

        match rx.await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::SocketClosed),
        }
    }

    /// Write one `RequestNext` and return as soon as the frame is flushed,
    /// without registering a waiter.
    ///
    /// `RequestNext` is the one method whose responses never carry a
    /// `reflection.requestId` a waiter would be keyed on in practice — per
    /// §4.4 step 5, an unmatched response is routed by `methodname` to the
    /// streaming sink instead. Sending it through [`Correlator::send`]
    /// would register a waiter no response ever fulfils (the roll falls
    /// through to the sink instead) and would block the pipelining loop on
    /// a full round trip per message, defeating the `inFlight` window
    /// entirely. This path exists so `ChainSyncEngine` can push its window
    /// onto the wire without awaiting a reply per send (§4.6, §8 invariant 3).
    pub async fn send_request_next(&self) -> BridgeResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BridgeError::SocketClosed);
        }
        let request_id = generate_request_id();
        let body = Self::encode(MethodName::RequestNext, Value::Object(Default::default()), &request_id)?;

        tracing::debug!(method = MethodName::RequestNext.as_str(), request_id = %request_id, "sending unconfirmed request");
        self.write.lock().await.send(Message::Text(body)).await?;
        Ok(())
    }

    fn encode(methodname: MethodName, args: Value, request_id: &str) -> BridgeResult<String> {
        let envelope = RequestEnvelope::new(methodname, args, request_id.to_string());
        serde_json::to_string(&envelope).map_err(|e| BridgeError::Malformed { raw: e.to_string() })
    }

    pub async fn close(&self) -> BridgeResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.write.lock().await.close().await.map_err(BridgeError::from)?;
        self.fail_all_waiters(BridgeError::SocketClosed).await;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_meet_the_minimum_length_and_alphabet() {
        for _ in 0..50 {
            let id = generate_request_id();
            assert!(id.len() >= 5);
            assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn request_ids_are_not_constant() {
        let a = generate_request_id();
        let b = generate_request_id();
        assert_ne!(a, b);
    }
}
