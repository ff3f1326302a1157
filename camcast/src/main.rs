mod http;
mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use camcast_core::{
    config::load_config, logging, DirectoryFrameSource, FrameBroadcaster, SettingsStore,
};

use server::CamcastServer;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    logging::init_logging(&config.logging)?;
    info!("Camcast server starting...");
    info!("HTTP address: {}", config.http_address());

    let source = Arc::new(DirectoryFrameSource::new(
        &config.camera.frames_dir,
        Duration::from_millis(config.camera.frame_interval_ms),
    ));
    let broadcaster = Arc::new(FrameBroadcaster::new(source));
    let settings = SettingsStore::new(&config.settings.path);

    let server = CamcastServer::new(config, broadcaster, settings);
    server.start().await?;

    Ok(())
}
