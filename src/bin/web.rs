use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use games_dashboard::config::DashboardConfig;
use games_dashboard::data::load_file;
use games_dashboard::web::DashboardServer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load(&std::env::current_dir()?);
    let dataset = load_file(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    let server = DashboardServer::new(Arc::new(dataset), config);
    let mut handle = server.start(None).await.map_err(|e| anyhow!(e))?;

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;
    log::info!("Shutting down");

    handle.shutdown();
    handle.wait().await;
    Ok(())
}
