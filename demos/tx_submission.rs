//! Submits a CBOR-hex transaction read from argv, mirroring
//! `tx_submission_client.py`'s example driver.

use anyhow::{bail, Result};
use ogmios_bridge_client::{ConnectionConfig, InteractionContext, TxSubmissionEngine};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tx_submission_demo=info".into()),
        )
        .init();

    let Some(cbor_hex) = std::env::args().nth(1) else {
        bail!("usage: tx_submission_demo <cbor-hex>");
    };

    let config = ConnectionConfig::from_env();
    let context = InteractionContext::new(config).await?;
    let engine = TxSubmissionEngine::new(&context);

    match engine.submit_tx(&cbor_hex).await {
        Ok(tx_id) => info!(%tx_id, "transaction submitted"),
        Err(error) => {
            error!(%error, "submission failed");
            return Err(error.into());
        }
    }

    Ok(())
}
