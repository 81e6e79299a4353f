use std::sync::Arc;

use tokio::task::JoinSet;

use crate::slider::{advance, Slider, Step};
use crate::storage::SliderStore;
use crate::{Error, Result};

/// Counters for one pass over the slider population
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Sliders in the snapshot
    pub sliders: u32,
    /// Sliders advanced and written back
    pub saved: u32,
    /// Sliders whose envelope is exhausted; nothing to write
    pub inert: u32,
    /// Sliders that reversed direction this tick
    pub reversals: u32,
    /// Writes skipped because an edit landed after the snapshot was read
    pub conflicts: u32,
    /// Sliders deleted after the snapshot was read
    pub removed: u32,
    /// Writes that failed; retried implicitly on the next tick
    pub failed: u32,
}

enum Outcome {
    Saved(Step),
    Inert,
    Conflict,
    Removed,
    Failed,
}

impl TickReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Saved(step) => {
                self.saved += 1;
                if step.is_reversal() {
                    self.reversals += 1;
                }
            }
            Outcome::Inert => self.inert += 1,
            Outcome::Conflict => self.conflicts += 1,
            Outcome::Removed => self.removed += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// Advance every slider in the store by one step and write each back.
///
/// A failed write is logged and counted without affecting the other
/// sliders. Only a failure to read the snapshot fails the tick.
/// `concurrency` bounds how many sliders are in flight at once.
pub async fn run_tick(store: Arc<dyn SliderStore>, concurrency: usize) -> Result<TickReport> {
    let sliders = store.list_all().await?;
    let mut report = TickReport {
        sliders: sliders.len() as u32,
        ..TickReport::default()
    };

    if concurrency <= 1 {
        for slider in sliders {
            report.record(step_and_save(store.as_ref(), slider).await);
        }
        return Ok(report);
    }

    let mut join_set: JoinSet<Outcome> = JoinSet::new();
    let mut iter = sliders.into_iter();

    fn spawn_step(join_set: &mut JoinSet<Outcome>, store: Arc<dyn SliderStore>, slider: Slider) {
        join_set.spawn(async move { step_and_save(store.as_ref(), slider).await });
    }

    for _ in 0..concurrency {
        if let Some(slider) = iter.next() {
            spawn_step(&mut join_set, Arc::clone(&store), slider);
        }
    }

    while let Some(result) = join_set.join_next().await {
        match result {
            Ok(outcome) => report.record(outcome),
            Err(e) => {
                tracing::error!("Slider step task failed: {}", e);
                report.record(Outcome::Failed);
            }
        }

        if let Some(slider) = iter.next() {
            spawn_step(&mut join_set, Arc::clone(&store), slider);
        }
    }

    Ok(report)
}

async fn step_and_save(store: &dyn SliderStore, mut slider: Slider) -> Outcome {
    let step = advance(&mut slider);
    if step == Step::Inert {
        return Outcome::Inert;
    }

    match store.save(&slider).await {
        Ok(()) => {
            if step == Step::Decayed {
                tracing::debug!(
                    "{} envelope decayed to {}",
                    slider,
                    slider.max_travel()
                );
            }
            Outcome::Saved(step)
        }
        Err(Error::VersionConflict { .. }) => {
            tracing::debug!("{} changed since the tick started, skipping", slider);
            Outcome::Conflict
        }
        Err(Error::SliderNotFound(_)) => {
            tracing::debug!("{} was removed since the tick started", slider);
            Outcome::Removed
        }
        Err(e) => {
            tracing::warn!("Failed to save {}: {}", slider, e);
            Outcome::Failed
        }
    }
}
