use std::sync::Arc;

use anyhow::Result;

use slider_core::{scheduler::SchedulerService, storage::Database, AppConfig};

pub async fn run(db: Arc<Database>, config: Arc<AppConfig>, ticks: u32) -> Result<()> {
    let scheduler = SchedulerService::new(db, config);

    for tick in 1..=ticks {
        let report = scheduler.tick_now().await?;
        println!(
            "Tick {}: {} saved, {} reversed, {} inert, {} conflicts, {} removed, {} failed",
            tick,
            report.saved,
            report.reversals,
            report.inert,
            report.conflicts,
            report.removed,
            report.failed
        );
    }

    Ok(())
}
