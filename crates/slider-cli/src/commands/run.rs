use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::info;

use slider_core::{scheduler::SchedulerService, storage::Database, AppConfig};

/// Run the scheduler until Ctrl+C
pub async fn run(db: Arc<Database>, config: Arc<AppConfig>) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    println!(
        "Slider simulation running at {} ticks/s. Press Ctrl+C to stop.",
        config.game.change_rate
    );

    let scheduler = SchedulerService::new(db, config);
    scheduler.run(shutdown_rx).await;

    println!("Simulation stopped.");
    Ok(())
}
