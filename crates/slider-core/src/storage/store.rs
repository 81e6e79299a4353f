use super::{Database, SliderRepository};
use crate::slider::Slider;
use crate::Result;

/// What the tick scheduler needs from storage
#[async_trait::async_trait]
pub trait SliderStore: Send + Sync {
    /// Point-in-time snapshot of every slider, order irrelevant
    async fn list_all(&self) -> Result<Vec<Slider>>;

    /// Write back one slider by id.
    /// Fails with `Error::VersionConflict` if it changed since it was read.
    async fn save(&self, slider: &Slider) -> Result<()>;
}

#[async_trait::async_trait]
impl SliderStore for Database {
    async fn list_all(&self) -> Result<Vec<Slider>> {
        SliderRepository::new(self).list_all().await
    }

    async fn save(&self, slider: &Slider) -> Result<()> {
        SliderRepository::new(self).update(slider).await?;
        Ok(())
    }
}
