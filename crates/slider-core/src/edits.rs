//! Externally submitted changes to sliders.
//!
//! Callers hand over a full `SliderSnapshot`, or a `SliderPatch` naming only
//! the fields to change. New sliders are validated strictly; existing
//! sliders are merged through the bounded setters, so the stored bounds win
//! over out-of-range input. Merges race the tick scheduler, which also
//! writes every slider, and are retried on version conflicts against a
//! fresh read.

use tracing::{debug, info};

use crate::slider::{Slider, SliderId, SliderPatch, SliderSnapshot};
use crate::storage::{Database, SliderRepository};
use crate::{Error, Result};

/// Attempts made to merge into a slider that keeps changing underneath us
const MAX_MERGE_ATTEMPTS: u32 = 5;

/// Result of an accepted edit
#[derive(Debug, Clone)]
pub enum Edit {
    Created(Slider),
    Updated(Slider),
}

impl Edit {
    pub fn slider(&self) -> &Slider {
        match self {
            Edit::Created(slider) | Edit::Updated(slider) => slider,
        }
    }

    pub fn into_slider(self) -> Slider {
        match self {
            Edit::Created(slider) | Edit::Updated(slider) => slider,
        }
    }
}

/// Create a slider, or merge into an existing one when the snapshot has an id.
///
/// A snapshot naming an id the store does not know is rejected with
/// `Error::SliderNotFound`.
pub async fn submit(db: &Database, snapshot: &SliderSnapshot) -> Result<Edit> {
    match snapshot.id {
        None => {
            let slider = snapshot.validate()?;
            let created = SliderRepository::new(db).create(&slider).await?;
            info!("Created {}", created);
            Ok(Edit::Created(created))
        }
        Some(id) => merge(db, id, |slider| slider.apply_snapshot(snapshot))
            .await
            .map(Edit::Updated),
    }
}

/// Merge into slider `id`, creating it under that id if it does not exist.
///
/// The snapshot must carry the same id. If another writer creates `id`
/// first, the snapshot is merged into that slider instead.
pub async fn replace(db: &Database, id: SliderId, snapshot: &SliderSnapshot) -> Result<Edit> {
    if snapshot.id != Some(id) {
        return Err(Error::IdMismatch {
            requested: id,
            body: snapshot.id,
        });
    }

    let repo = SliderRepository::new(db);
    if repo.find_by_id(id).await?.is_none() {
        let slider = snapshot.validate()?;
        match repo.create_with_id(id, &slider).await {
            Ok(created) => {
                info!("Created {}", created);
                return Ok(Edit::Created(created));
            }
            Err(e) if is_duplicate_id(&e) => {
                debug!(%id, "Slider created concurrently, merging instead");
            }
            Err(e) => return Err(e),
        }
    }

    merge(db, id, |slider| slider.apply_snapshot(snapshot))
        .await
        .map(Edit::Updated)
}

/// Change only the fields set in `patch` on slider `id`.
///
/// Each attempt re-reads the slider, so motion state advanced by the
/// scheduler meanwhile is kept unless the patch sets it.
pub async fn patch(db: &Database, id: SliderId, patch: &SliderPatch) -> Result<Slider> {
    merge(db, id, |slider| patch.apply_to(slider)).await
}

/// Delete slider `id`
pub async fn remove(db: &Database, id: SliderId) -> Result<()> {
    if !SliderRepository::new(db).delete(id).await? {
        return Err(Error::SliderNotFound(id));
    }
    info!(%id, "Removed slider");
    Ok(())
}

fn is_duplicate_id(err: &Error) -> bool {
    match err {
        Error::Database(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    }
}

async fn merge<F>(db: &Database, id: SliderId, change: F) -> Result<Slider>
where
    F: Fn(&mut Slider),
{
    let repo = SliderRepository::new(db);
    let mut attempt = 1;

    loop {
        let mut slider = repo
            .find_by_id(id)
            .await?
            .ok_or(Error::SliderNotFound(id))?;
        change(&mut slider);

        match repo.update(&slider).await {
            Ok(saved) => {
                info!("Updated {}", saved);
                return Ok(saved);
            }
            Err(Error::VersionConflict { .. }) if attempt < MAX_MERGE_ATTEMPTS => {
                debug!(%id, attempt, "Slider changed during merge, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::run_tick;
    use crate::storage::SliderStore;
    use std::sync::Arc;

    fn snapshot(id: Option<i64>) -> SliderSnapshot {
        SliderSnapshot {
            id: id.map(SliderId::new),
            x: 100,
            y: 200,
            ..SliderSnapshot::default()
        }
    }

    #[tokio::test]
    async fn test_submit_without_id_creates() {
        let db = Database::new_in_memory().await.unwrap();

        let edit = submit(&db, &snapshot(None)).await.unwrap();
        assert!(matches!(edit, Edit::Created(_)));
        assert_eq!(edit.slider().x(), 100);
        assert_eq!(SliderRepository::new(&db).count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_submit_new_slider_validates_strictly() {
        let db = Database::new_in_memory().await.unwrap();

        let mut bad = snapshot(None);
        bad.size = 999;
        let err = submit(&db, &bad).await.unwrap_err();
        assert!(matches!(err, Error::InvalidSlider(_)));
        assert_eq!(SliderRepository::new(&db).count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submit_with_id_merges() {
        let db = Database::new_in_memory().await.unwrap();
        let created = submit(&db, &snapshot(None)).await.unwrap().into_slider();
        let id = created.id().unwrap();

        let update = SliderSnapshot {
            id: Some(id),
            x: 1500,
            y: 10,
            size: 999,
            current_travel: -20,
            mvt_direction: -1,
            dir_change_count: 3,
            ..SliderSnapshot::default()
        };
        let edit = submit(&db, &update).await.unwrap();
        assert!(matches!(edit, Edit::Updated(_)));

        let stored = SliderRepository::new(&db).find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.x(), 100);
        assert_eq!(stored.y(), 10);
        assert_eq!(stored.size(), 50);
        assert_eq!(stored.current_travel(), -20);
        assert_eq!(stored.mvt_direction(), -1);
        assert_eq!(stored.dir_change_count(), 3);
        assert_eq!(stored.version(), 2);
    }

    #[tokio::test]
    async fn test_submit_unknown_id_is_not_found() {
        let db = Database::new_in_memory().await.unwrap();

        let err = submit(&db, &snapshot(Some(77))).await.unwrap_err();
        assert!(matches!(err, Error::SliderNotFound(id) if id.get() == 77));
    }

    #[tokio::test]
    async fn test_replace_requires_matching_id() {
        let db = Database::new_in_memory().await.unwrap();

        let err = replace(&db, SliderId::new(1), &snapshot(Some(2)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::IdMismatch { .. }));

        let err = replace(&db, SliderId::new(1), &snapshot(None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::IdMismatch { body: None, .. }));
    }

    #[tokio::test]
    async fn test_replace_creates_then_updates() {
        let db = Database::new_in_memory().await.unwrap();
        let id = SliderId::new(9);

        let edit = replace(&db, id, &snapshot(Some(9))).await.unwrap();
        assert!(matches!(edit, Edit::Created(ref s) if s.id() == Some(id)));

        let mut change = snapshot(Some(9));
        change.x = 640;
        let edit = replace(&db, id, &change).await.unwrap();
        assert!(matches!(edit, Edit::Updated(ref s) if s.x() == 640));
        assert_eq!(SliderRepository::new(&db).count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let db = Database::new_in_memory().await.unwrap();
        let id = submit(&db, &snapshot(None))
            .await
            .unwrap()
            .into_slider()
            .id()
            .unwrap();

        remove(&db, id).await.unwrap();
        assert!(matches!(
            remove(&db, id).await,
            Err(Error::SliderNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_id_is_detected() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = SliderRepository::new(&db);
        let id = SliderId::new(5);

        repo.create_with_id(id, &Slider::new(1, 1)).await.unwrap();
        let err = repo
            .create_with_id(id, &Slider::new(2, 2))
            .await
            .unwrap_err();
        assert!(is_duplicate_id(&err));
        assert!(!is_duplicate_id(&Error::SliderNotFound(id)));
    }

    #[tokio::test]
    async fn test_patch_keeps_motion_advanced_by_ticks() {
        let db = Database::new_in_memory().await.unwrap();
        let id = submit(&db, &snapshot(None))
            .await
            .unwrap()
            .into_slider()
            .id()
            .unwrap();

        let store: Arc<dyn SliderStore> = Arc::new(db.clone());
        for _ in 0..3 {
            run_tick(store.clone(), 1).await.unwrap();
        }

        let change = SliderPatch {
            x: Some(10),
            ..SliderPatch::default()
        };
        let saved = patch(&db, id, &change).await.unwrap();
        assert_eq!(saved.x(), 10);
        assert_eq!(saved.y(), 200);
        assert_eq!(saved.current_travel(), 15);
        assert_eq!(saved.version(), 5);

        let stored = SliderRepository::new(&db).find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.current_travel(), 15);
        assert_eq!(stored.x(), 10);
    }

    #[tokio::test]
    async fn test_patch_unknown_slider() {
        let db = Database::new_in_memory().await.unwrap();

        let err = patch(&db, SliderId::new(3), &SliderPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SliderNotFound(_)));
    }
}
