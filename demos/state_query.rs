//! Queries the bridge's current chain tip and block height over a one-shot
//! connection, mirroring `query_chain_tip_example.py` /
//! `query_block_height_example.py`.

use anyhow::Result;
use ogmios_bridge_client::{ConnectionConfig, InteractionContext, StateQueryEngine};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "state_query_demo=info".into()),
        )
        .init();

    let config = ConnectionConfig::from_env();
    info!(?config.host, ?config.port, "connecting to bridge");

    let context = InteractionContext::new(config).await?;
    let engine = StateQueryEngine::new(&context);

    let tip = engine.chain_tip().await?;
    info!(?tip, "chain tip");

    let height = engine.block_height().await?;
    info!(?height, "block height");

    Ok(())
}
