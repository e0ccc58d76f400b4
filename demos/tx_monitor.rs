//! Acquires a mempool snapshot and drains it one transaction at a time,
//! mirroring `tx_monitor_client.py`'s example driver.

use anyhow::Result;
use ogmios_bridge_client::{ConnectionConfig, InteractionContext, InteractionType, TxMonitorEngine};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tx_monitor_demo=info".into()),
        )
        .init();

    let mut config = ConnectionConfig::from_env();
    config.interaction_type = InteractionType::LongRunning;

    let context = InteractionContext::new(config).await?;
    let engine = TxMonitorEngine::new(&context);

    let slot = engine.await_acquire().await?;
    info!(slot, "acquired mempool snapshot");

    let capacity = engine.size_and_capacity().await?;
    info!(?capacity, "mempool size and capacity");

    let mut count = 0;
    while let Some(tx) = engine.next_tx().await? {
        count += 1;
        info!(?tx, "mempool transaction");
    }
    info!(count, "reached end of mempool snapshot");

    engine.release().await?;
    Ok(())
}
