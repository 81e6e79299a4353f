use chrono::Utc;
use sqlx::FromRow;

use super::retry::with_retry;
use super::Database;
use crate::slider::{Slider, SliderId, SliderSnapshot};
use crate::{Error, Result};

/// Repository for slider CRUD operations
pub struct SliderRepository<'a> {
    db: &'a Database,
}

#[derive(FromRow)]
struct SliderRow {
    id: i64,
    version: i64,
    x: i32,
    y: i32,
    size: i32,
    max_travel: i32,
    current_travel: i32,
    mvt_direction: i32,
    dir_change_count: i32,
}

impl From<SliderRow> for Slider {
    fn from(row: SliderRow) -> Self {
        let state = SliderSnapshot {
            id: None,
            x: row.x,
            y: row.y,
            size: row.size,
            max_travel: row.max_travel,
            current_travel: row.current_travel,
            mvt_direction: row.mvt_direction,
            dir_change_count: row.dir_change_count,
        };
        Slider::restore(SliderId::new(row.id), row.version, &state)
    }
}

const SELECT_SLIDERS: &str = r#"
    SELECT id, version, x, y, size, max_travel, current_travel, mvt_direction, dir_change_count
    FROM sliders
"#;

impl<'a> SliderRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new slider and return it with its store-assigned id
    pub async fn create(&self, slider: &Slider) -> Result<Slider> {
        let now = Utc::now();
        let pool = self.db.pool().clone();

        let result = with_retry(|| {
            let pool = pool.clone();
            async move {
                sqlx::query(
                    r#"
                    INSERT INTO sliders
                        (x, y, size, max_travel, current_travel, mvt_direction,
                         dir_change_count, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(slider.x())
                .bind(slider.y())
                .bind(slider.size())
                .bind(slider.max_travel())
                .bind(slider.current_travel())
                .bind(slider.mvt_direction())
                .bind(slider.dir_change_count())
                .bind(now)
                .bind(now)
                .execute(&pool)
                .await
            }
        })
        .await?;

        let id = SliderId::new(result.last_insert_rowid());
        tracing::debug!(%id, "Created slider");

        self.find_by_id(id)
            .await?
            .ok_or(Error::SliderNotFound(id))
    }

    /// Insert a slider under a caller-chosen id
    pub async fn create_with_id(&self, id: SliderId, slider: &Slider) -> Result<Slider> {
        let now = Utc::now();
        let pool = self.db.pool().clone();

        with_retry(|| {
            let pool = pool.clone();
            async move {
                sqlx::query(
                    r#"
                    INSERT INTO sliders
                        (id, x, y, size, max_travel, current_travel, mvt_direction,
                         dir_change_count, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(id.get())
                .bind(slider.x())
                .bind(slider.y())
                .bind(slider.size())
                .bind(slider.max_travel())
                .bind(slider.current_travel())
                .bind(slider.mvt_direction())
                .bind(slider.dir_change_count())
                .bind(now)
                .bind(now)
                .execute(&pool)
                .await
            }
        })
        .await?;

        tracing::debug!(%id, "Created slider with explicit id");

        self.find_by_id(id)
            .await?
            .ok_or(Error::SliderNotFound(id))
    }

    /// Find a slider by ID
    pub async fn find_by_id(&self, id: SliderId) -> Result<Option<Slider>> {
        let sql = format!("{} WHERE id = ?", SELECT_SLIDERS);
        let pool = self.db.pool().clone();

        let row = with_retry(|| {
            let pool = pool.clone();
            let sql = sql.as_str();
            async move {
                sqlx::query_as::<_, SliderRow>(sql)
                    .bind(id.get())
                    .fetch_optional(&pool)
                    .await
            }
        })
        .await?;

        Ok(row.map(Slider::from))
    }

    /// Get every slider, ordered by id
    pub async fn list_all(&self) -> Result<Vec<Slider>> {
        let sql = format!("{} ORDER BY id ASC", SELECT_SLIDERS);
        let pool = self.db.pool().clone();

        let rows = with_retry(|| {
            let pool = pool.clone();
            let sql = sql.as_str();
            async move { sqlx::query_as::<_, SliderRow>(sql).fetch_all(&pool).await }
        })
        .await?;

        Ok(rows.into_iter().map(Slider::from).collect())
    }

    /// Get the sliders at positions `from..to` in id order
    pub async fn find_range(&self, from: u32, to: u32) -> Result<Vec<Slider>> {
        if to < from {
            return Err(Error::InvalidRange { from, to });
        }

        let sql = format!("{} ORDER BY id ASC LIMIT ? OFFSET ?", SELECT_SLIDERS);
        let pool = self.db.pool().clone();

        let rows = with_retry(|| {
            let pool = pool.clone();
            let sql = sql.as_str();
            async move {
                sqlx::query_as::<_, SliderRow>(sql)
                    .bind(i64::from(to - from))
                    .bind(i64::from(from))
                    .fetch_all(&pool)
                    .await
            }
        })
        .await?;

        Ok(rows.into_iter().map(Slider::from).collect())
    }

    /// Write back a persisted slider.
    ///
    /// Succeeds only if the stored version still matches `slider.version()`;
    /// the returned copy carries the bumped version.
    pub async fn update(&self, slider: &Slider) -> Result<Slider> {
        let id = slider.id().ok_or_else(|| {
            Error::InvalidSlider("cannot update a slider that was never created".to_string())
        })?;
        let now = Utc::now();
        let pool = self.db.pool().clone();

        let result = with_retry(|| {
            let pool = pool.clone();
            async move {
                sqlx::query(
                    r#"
                    UPDATE sliders
                    SET x = ?,
                        y = ?,
                        size = ?,
                        max_travel = ?,
                        current_travel = ?,
                        mvt_direction = ?,
                        dir_change_count = ?,
                        version = version + 1,
                        updated_at = ?
                    WHERE id = ? AND version = ?
                    "#,
                )
                .bind(slider.x())
                .bind(slider.y())
                .bind(slider.size())
                .bind(slider.max_travel())
                .bind(slider.current_travel())
                .bind(slider.mvt_direction())
                .bind(slider.dir_change_count())
                .bind(now)
                .bind(id.get())
                .bind(slider.version())
                .execute(&pool)
                .await
            }
        })
        .await?;

        if result.rows_affected() == 0 {
            if self.exists(id).await? {
                return Err(Error::VersionConflict {
                    id,
                    expected: slider.version(),
                });
            }
            return Err(Error::SliderNotFound(id));
        }

        Ok(Slider::restore(id, slider.version() + 1, &slider.snapshot()))
    }

    /// Delete a slider
    pub async fn delete(&self, id: SliderId) -> Result<bool> {
        let pool = self.db.pool().clone();

        let result = with_retry(|| {
            let pool = pool.clone();
            async move {
                sqlx::query("DELETE FROM sliders WHERE id = ?")
                    .bind(id.get())
                    .execute(&pool)
                    .await
            }
        })
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get total slider count
    pub async fn count(&self) -> Result<u32> {
        let pool = self.db.pool().clone();

        let count: (i64,) = with_retry(|| {
            let pool = pool.clone();
            async move {
                sqlx::query_as("SELECT COUNT(*) FROM sliders")
                    .fetch_one(&pool)
                    .await
            }
        })
        .await?;

        Ok(count.0 as u32)
    }

    async fn exists(&self, id: SliderId) -> Result<bool> {
        let pool = self.db.pool().clone();

        let row: Option<(i64,)> = with_retry(|| {
            let pool = pool.clone();
            async move {
                sqlx::query_as("SELECT id FROM sliders WHERE id = ?")
                    .bind(id.get())
                    .fetch_optional(&pool)
                    .await
            }
        })
        .await?;

        Ok(row.is_some())
    }
}
