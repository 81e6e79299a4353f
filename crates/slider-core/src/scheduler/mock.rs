use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::slider::{Slider, SliderId, SliderSnapshot};
use crate::storage::SliderStore;
use crate::{Error, Result};

/// In-memory store with injectable failures
#[derive(Default)]
pub struct MockStore {
    sliders: Mutex<BTreeMap<SliderId, Slider>>,
    fail_on: Option<SliderId>,
    conflict_on: Option<SliderId>,
    remove_after_list: Option<SliderId>,
    fail_list: bool,
    panic_next_list: AtomicBool,
}

impl MockStore {
    pub fn with_sliders(states: &[SliderSnapshot]) -> Self {
        let sliders = states
            .iter()
            .enumerate()
            .map(|(i, state)| {
                let id = SliderId::new(i as i64 + 1);
                (id, Slider::restore(id, 1, state))
            })
            .collect();
        Self {
            sliders: Mutex::new(sliders),
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, id: i64) -> Self {
        self.fail_on = Some(SliderId::new(id));
        self
    }

    pub fn conflicting_on(mut self, id: i64) -> Self {
        self.conflict_on = Some(SliderId::new(id));
        self
    }

    /// Delete slider `id` once the next snapshot has been handed out
    pub fn removing_after_list(mut self, id: i64) -> Self {
        self.remove_after_list = Some(SliderId::new(id));
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn panicking_once(self) -> Self {
        self.panic_next_list.store(true, Ordering::SeqCst);
        self
    }

    pub fn get(&self, id: i64) -> Slider {
        self.sliders.lock().unwrap()[&SliderId::new(id)].clone()
    }
}

#[async_trait::async_trait]
impl SliderStore for MockStore {
    async fn list_all(&self) -> Result<Vec<Slider>> {
        if self.panic_next_list.swap(false, Ordering::SeqCst) {
            panic!("store blew up");
        }
        if self.fail_list {
            return Err(Error::Other("store unavailable".to_string()));
        }
        let mut sliders = self.sliders.lock().unwrap();
        let snapshot = sliders.values().cloned().collect();
        if let Some(id) = self.remove_after_list {
            sliders.remove(&id);
        }
        Ok(snapshot)
    }

    async fn save(&self, slider: &Slider) -> Result<()> {
        let id = slider.id().ok_or(Error::Other("transient".to_string()))?;
        if self.fail_on == Some(id) {
            return Err(Error::Other("disk full".to_string()));
        }
        if self.conflict_on == Some(id) {
            return Err(Error::VersionConflict {
                id,
                expected: slider.version(),
            });
        }

        let mut sliders = self.sliders.lock().unwrap();
        let stored = sliders.get(&id).ok_or(Error::SliderNotFound(id))?;
        if stored.version() != slider.version() {
            return Err(Error::VersionConflict {
                id,
                expected: slider.version(),
            });
        }
        sliders.insert(
            id,
            Slider::restore(id, slider.version() + 1, &slider.snapshot()),
        );
        Ok(())
    }
}
