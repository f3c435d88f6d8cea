//! The `woordspel relay` command.

use anyhow::Result;

use woordspel_relay::RelayConfig;

pub async fn execute(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = RelayConfig::from_env();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    tracing::debug!(?config, "relay configuration");

    woordspel_relay::run(config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    })
    .await
}
