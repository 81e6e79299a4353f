use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, trace, warn};

use crate::config::AppConfig;
use crate::storage::SliderStore;
use crate::Result;

use super::tasks::{run_tick, TickReport};

/// Events emitted by the scheduler
#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    /// A tick finished; some writes inside it may still have failed
    TickCompleted(TickReport),
    /// A whole tick was lost
    Error { task: String, message: String },
}

/// Background service advancing every slider at a fixed rate
pub struct SchedulerService {
    store: Arc<dyn SliderStore>,
    config: Arc<AppConfig>,
    event_tx: Option<mpsc::UnboundedSender<SchedulerEvent>>,
}

impl SchedulerService {
    /// Create a new scheduler service
    pub fn new(store: Arc<dyn SliderStore>, config: Arc<AppConfig>) -> Self {
        Self {
            store,
            config,
            event_tx: None,
        }
    }

    /// Set the event sender for tick notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<SchedulerEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn send_event(&self, event: SchedulerEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send scheduler event: receiver dropped");
            }
        }
    }

    /// Run ticks until `true` is sent on `shutdown` or its sender is dropped.
    ///
    /// Neither a failed tick nor a panic inside one ends the loop.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let Some(period) = self.config.game.tick_period() else {
            info!("Slider scheduler disabled (change_rate = 0)");
            let _ = shutdown.changed().await;
            return;
        };

        info!(
            "Slider scheduler started: {} ticks/s, concurrency {}",
            self.config.game.change_rate, self.config.game.tick_concurrency
        );

        let mut ticker = tokio::time::interval(period);
        // A slow tick pushes the schedule back instead of bursting to catch up
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() {
                        info!("Shutdown sender dropped, stopping scheduler");
                        break;
                    }
                    if *shutdown.borrow() {
                        info!("Scheduler received shutdown signal");
                        break;
                    }
                }

                _ = ticker.tick() => {
                    self.tick_isolated().await;
                }
            }
        }

        info!("Slider scheduler stopped");
    }

    /// Run one tick on its own task so a panic is contained to that tick
    async fn tick_isolated(&self) {
        let store = Arc::clone(&self.store);
        let concurrency = self.config.game.tick_concurrency;

        match tokio::spawn(run_tick(store, concurrency)).await {
            Ok(Ok(report)) => {
                if report.failed > 0 {
                    warn!(
                        "Tick saved {}/{} sliders, {} writes failed",
                        report.saved, report.sliders, report.failed
                    );
                } else {
                    trace!(?report, "Tick completed");
                }
                self.send_event(SchedulerEvent::TickCompleted(report));
            }
            Ok(Err(e)) => {
                error!("Tick failed: {}", e);
                self.send_event(SchedulerEvent::Error {
                    task: "tick".to_string(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                error!("Tick aborted: {}", e);
                self.send_event(SchedulerEvent::Error {
                    task: "tick".to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    /// Run a single tick immediately
    pub async fn tick_now(&self) -> Result<TickReport> {
        let report = run_tick(Arc::clone(&self.store), self.config.game.tick_concurrency).await?;
        self.send_event(SchedulerEvent::TickCompleted(report));
        Ok(report)
    }
}
