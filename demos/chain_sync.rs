//! Follows the chain from its current tip, logging each roll, mirroring
//! `chain_sync_client_example.py`.

use anyhow::Result;
use async_trait::async_trait;
use ogmios_bridge_client::chain_sync::{ChainSyncHandler, RequestNextToken};
use ogmios_bridge_client::wire::{Block, TipOrOrigin};
use ogmios_bridge_client::{ChainSyncEngine, ConnectionConfig, InteractionContext, InteractionType};
use tracing::info;

struct LoggingHandler;

#[async_trait]
impl ChainSyncHandler for LoggingHandler {
    async fn on_roll_forward(&self, block: Block, tip: TipOrOrigin, request_next: RequestNextToken<'_>) {
        let era = match &block {
            Block::Byron(_) => "byron",
            Block::Shelley(_) => "shelley",
            Block::Allegra(_) => "allegra",
            Block::Mary(_) => "mary",
            Block::Alonzo(_) => "alonzo",
            Block::Babbage(_) => "babbage",
        };
        info!(?tip, era, "roll forward");
        if let Err(error) = request_next.request_next().await {
            tracing::warn!(%error, "failed to request next block");
        }
    }

    async fn on_roll_backward(
        &self,
        point: ogmios_bridge_client::wire::PointOrOrigin,
        tip: TipOrOrigin,
        request_next: RequestNextToken<'_>,
    ) {
        info!(?point, ?tip, "roll backward");
        if let Err(error) = request_next.request_next().await {
            tracing::warn!(%error, "failed to request next block");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chain_sync_demo=info".into()),
        )
        .init();

    let mut config = ConnectionConfig::from_env();
    config.interaction_type = InteractionType::LongRunning;

    let context = InteractionContext::new(config).await?;
    let engine = ChainSyncEngine::new(&context);
    let handler = LoggingHandler;

    engine.start_sync(vec![], Some(5), &handler).await?;

    Ok(())
}
