use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Grid width; `x` must stay within `0..=X_LIMIT`
pub const X_LIMIT: i32 = 1000;
/// Grid height; `y` must stay within `0..=Y_LIMIT`
pub const Y_LIMIT: i32 = 1000;
pub const SIZE_LIMIT: i32 = 100;
pub const MAX_TRAVEL_LIMIT: i32 = 200;
/// Default for both `size` and `max_travel`
pub const INITIAL_SIZE: i32 = 50;

fn x_in_bounds(x: i32) -> bool {
    (0..=X_LIMIT).contains(&x)
}

fn y_in_bounds(y: i32) -> bool {
    (0..=Y_LIMIT).contains(&y)
}

fn size_in_bounds(size: i32) -> bool {
    (1..=SIZE_LIMIT).contains(&size)
}

fn max_travel_in_bounds(max_travel: i32) -> bool {
    (1..=MAX_TRAVEL_LIMIT).contains(&max_travel)
}

/// Store-assigned slider identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SliderId(i64);

impl SliderId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A slider moving on the grid.
///
/// Bounded fields (`x`, `y`, `size`, `max_travel`) are written through
/// setters that silently keep the previous value when handed something out
/// of range. Motion bookkeeping (`current_travel`, `mvt_direction`,
/// `dir_change_count`) is written unconditionally.
///
/// Equality is identity by store id. A slider without an id is never equal
/// to anything, itself included, so only `PartialEq` is implemented.
#[derive(Debug, Clone, Serialize)]
pub struct Slider {
    pub(super) id: Option<SliderId>,
    pub(super) version: i64,
    pub(super) x: i32,
    pub(super) y: i32,
    pub(super) size: i32,
    pub(super) max_travel: i32,
    pub(super) current_travel: i32,
    pub(super) mvt_direction: i32,
    pub(super) dir_change_count: i32,
}

impl Slider {
    /// Create a transient slider at `(x, y)` with default motion state.
    ///
    /// Out-of-range coordinates fall back to 0, the same way a setter would
    /// leave the default untouched.
    pub fn new(x: i32, y: i32) -> Self {
        let mut slider = Self {
            id: None,
            version: 0,
            x: 0,
            y: 0,
            size: INITIAL_SIZE,
            max_travel: INITIAL_SIZE,
            current_travel: 0,
            mvt_direction: 1,
            dir_change_count: 0,
        };
        slider.set_x(x);
        slider.set_y(y);
        slider
    }

    /// Rebuild a persisted slider from stored state
    pub(crate) fn restore(id: SliderId, version: i64, state: &SliderSnapshot) -> Self {
        Self {
            id: Some(id),
            version,
            x: state.x,
            y: state.y,
            size: state.size,
            max_travel: state.max_travel,
            current_travel: state.current_travel,
            mvt_direction: state.mvt_direction,
            dir_change_count: state.dir_change_count,
        }
    }

    pub fn id(&self) -> Option<SliderId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Store revision this copy was read at
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn max_travel(&self) -> i32 {
        self.max_travel
    }

    pub fn current_travel(&self) -> i32 {
        self.current_travel
    }

    pub fn mvt_direction(&self) -> i32 {
        self.mvt_direction
    }

    pub fn dir_change_count(&self) -> i32 {
        self.dir_change_count
    }

    pub fn set_x(&mut self, x: i32) {
        if x_in_bounds(x) {
            self.x = x;
        }
    }

    pub fn set_y(&mut self, y: i32) {
        if y_in_bounds(y) {
            self.y = y;
        }
    }

    pub fn set_size(&mut self, size: i32) {
        if size_in_bounds(size) {
            self.size = size;
        }
    }

    pub fn set_max_travel(&mut self, max_travel: i32) {
        if max_travel_in_bounds(max_travel) {
            self.max_travel = max_travel;
        }
    }

    pub fn set_current_travel(&mut self, current_travel: i32) {
        self.current_travel = current_travel;
    }

    pub fn set_mvt_direction(&mut self, mvt_direction: i32) {
        self.mvt_direction = mvt_direction;
    }

    pub fn set_dir_change_count(&mut self, dir_change_count: i32) {
        self.dir_change_count = dir_change_count;
    }

    /// Merge an externally supplied state into this slider.
    ///
    /// Bounded fields are copied only when in range; motion bookkeeping is
    /// copied as-is. The id and version are never taken from `other`.
    pub fn apply_snapshot(&mut self, other: &SliderSnapshot) {
        self.set_x(other.x);
        self.set_y(other.y);
        self.set_size(other.size);
        self.set_max_travel(other.max_travel);

        self.current_travel = other.current_travel;
        self.mvt_direction = other.mvt_direction;
        self.dir_change_count = other.dir_change_count;
    }

    pub fn snapshot(&self) -> SliderSnapshot {
        SliderSnapshot {
            id: self.id,
            x: self.x,
            y: self.y,
            size: self.size,
            max_travel: self.max_travel,
            current_travel: self.current_travel,
            mvt_direction: self.mvt_direction,
            dir_change_count: self.dir_change_count,
        }
    }
}

impl PartialEq for Slider {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "Slider[id={}]", id),
            None => write!(f, "Slider[transient]"),
        }
    }
}

/// Unvalidated slider state, as submitted by a caller or read from storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderSnapshot {
    #[serde(default)]
    pub id: Option<SliderId>,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default = "default_size")]
    pub size: i32,
    #[serde(default = "default_size")]
    pub max_travel: i32,
    #[serde(default)]
    pub current_travel: i32,
    #[serde(default = "default_direction")]
    pub mvt_direction: i32,
    #[serde(default)]
    pub dir_change_count: i32,
}

fn default_size() -> i32 {
    INITIAL_SIZE
}

fn default_direction() -> i32 {
    1
}

impl Default for SliderSnapshot {
    fn default() -> Self {
        Self {
            id: None,
            x: 0,
            y: 0,
            size: default_size(),
            max_travel: default_size(),
            current_travel: 0,
            mvt_direction: default_direction(),
            dir_change_count: 0,
        }
    }
}

impl SliderSnapshot {
    /// Build a transient slider, failing on the first out-of-range field.
    ///
    /// Used where a caller hands over a brand new slider and there is no
    /// previous value to fall back on. Any `id` in the snapshot is dropped;
    /// ids are assigned by the store.
    pub fn validate(&self) -> Result<Slider> {
        if !x_in_bounds(self.x) {
            return Err(invalid("x", self.x, 0, X_LIMIT));
        }
        if !y_in_bounds(self.y) {
            return Err(invalid("y", self.y, 0, Y_LIMIT));
        }
        if !size_in_bounds(self.size) {
            return Err(invalid("size", self.size, 1, SIZE_LIMIT));
        }
        if !max_travel_in_bounds(self.max_travel) {
            return Err(invalid("max_travel", self.max_travel, 1, MAX_TRAVEL_LIMIT));
        }
        if self.mvt_direction != 1 && self.mvt_direction != -1 {
            return Err(Error::InvalidSlider(format!(
                "mvt_direction must be 1 or -1, got {}",
                self.mvt_direction
            )));
        }
        if self.dir_change_count < 0 {
            return Err(Error::InvalidSlider(format!(
                "dir_change_count must not be negative, got {}",
                self.dir_change_count
            )));
        }

        Ok(Slider {
            id: None,
            version: 0,
            x: self.x,
            y: self.y,
            size: self.size,
            max_travel: self.max_travel,
            current_travel: self.current_travel,
            mvt_direction: self.mvt_direction,
            dir_change_count: self.dir_change_count,
        })
    }
}

fn invalid(field: &str, value: i32, min: i32, max: i32) -> Error {
    Error::InvalidSlider(format!(
        "{} must be within {}..={}, got {}",
        field, min, max, value
    ))
}

/// A partial change to a stored slider; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliderPatch {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub size: Option<i32>,
    pub max_travel: Option<i32>,
    pub current_travel: Option<i32>,
    pub mvt_direction: Option<i32>,
    pub dir_change_count: Option<i32>,
}

impl SliderPatch {
    /// Write the set fields through the regular setters, so bounded fields
    /// still ignore out-of-range values.
    pub fn apply_to(&self, slider: &mut Slider) {
        if let Some(x) = self.x {
            slider.set_x(x);
        }
        if let Some(y) = self.y {
            slider.set_y(y);
        }
        if let Some(size) = self.size {
            slider.set_size(size);
        }
        if let Some(max_travel) = self.max_travel {
            slider.set_max_travel(max_travel);
        }
        if let Some(current_travel) = self.current_travel {
            slider.set_current_travel(current_travel);
        }
        if let Some(mvt_direction) = self.mvt_direction {
            slider.set_mvt_direction(mvt_direction);
        }
        if let Some(dir_change_count) = self.dir_change_count {
            slider.set_dir_change_count(dir_change_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted(id: i64) -> Slider {
        Slider::restore(SliderId::new(id), 1, &SliderSnapshot::default())
    }

    #[test]
    fn test_new_slider_defaults() {
        let slider = Slider::new(10, 20);
        assert_eq!(slider.x(), 10);
        assert_eq!(slider.y(), 20);
        assert_eq!(slider.size(), 50);
        assert_eq!(slider.max_travel(), 50);
        assert_eq!(slider.current_travel(), 0);
        assert_eq!(slider.mvt_direction(), 1);
        assert_eq!(slider.dir_change_count(), 0);
        assert!(slider.id().is_none());
    }

    #[test]
    fn test_new_slider_ignores_out_of_range_position() {
        let slider = Slider::new(-5, 1001);
        assert_eq!(slider.x(), 0);
        assert_eq!(slider.y(), 0);
    }

    #[test]
    fn test_set_x_out_of_range_keeps_value() {
        let mut slider = Slider::new(10, 0);
        slider.set_x(1500);
        assert_eq!(slider.x(), 10);
        slider.set_x(-1);
        assert_eq!(slider.x(), 10);
    }

    #[test]
    fn test_set_x_in_range() {
        let mut slider = Slider::new(10, 0);
        slider.set_x(500);
        assert_eq!(slider.x(), 500);
        slider.set_x(X_LIMIT);
        assert_eq!(slider.x(), X_LIMIT);
    }

    #[test]
    fn test_bounded_setters_edges() {
        let mut slider = Slider::new(0, 0);

        slider.set_size(0);
        assert_eq!(slider.size(), 50);
        slider.set_size(100);
        assert_eq!(slider.size(), 100);
        slider.set_size(101);
        assert_eq!(slider.size(), 100);

        slider.set_max_travel(201);
        assert_eq!(slider.max_travel(), 50);
        slider.set_max_travel(1);
        assert_eq!(slider.max_travel(), 1);

        slider.set_y(1000);
        assert_eq!(slider.y(), 1000);
        slider.set_y(1001);
        assert_eq!(slider.y(), 1000);
    }

    #[test]
    fn test_unbounded_setters_write_anything() {
        let mut slider = Slider::new(0, 0);
        slider.set_current_travel(-9999);
        slider.set_mvt_direction(7);
        slider.set_dir_change_count(-3);
        assert_eq!(slider.current_travel(), -9999);
        assert_eq!(slider.mvt_direction(), 7);
        assert_eq!(slider.dir_change_count(), -3);
    }

    #[test]
    fn test_apply_snapshot_rejects_out_of_range_size() {
        let mut target = Slider::new(10, 10);
        let source = SliderSnapshot {
            size: 999,
            x: 300,
            current_travel: 12,
            mvt_direction: -1,
            dir_change_count: 4,
            ..SliderSnapshot::default()
        };

        target.apply_snapshot(&source);

        assert_eq!(target.size(), 50);
        assert_eq!(target.x(), 300);
        assert_eq!(target.current_travel(), 12);
        assert_eq!(target.mvt_direction(), -1);
        assert_eq!(target.dir_change_count(), 4);
    }

    #[test]
    fn test_apply_snapshot_keeps_identity() {
        let mut target = persisted(7);
        let source = SliderSnapshot {
            id: Some(SliderId::new(99)),
            ..SliderSnapshot::default()
        };

        target.apply_snapshot(&source);

        assert_eq!(target.id(), Some(SliderId::new(7)));
        assert_eq!(target.version(), 1);
    }

    #[test]
    fn test_equality_by_id() {
        assert_eq!(persisted(1), persisted(1));
        assert_ne!(persisted(1), persisted(2));

        let mut moved = persisted(1);
        moved.set_x(900);
        assert_eq!(moved, persisted(1));
    }

    #[test]
    fn test_transient_sliders_never_equal() {
        let a = Slider::new(1, 1);
        let b = Slider::new(1, 1);
        assert_ne!(a, b);
        assert_ne!(a, a.clone());
        assert_ne!(a, persisted(1));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let snapshot = SliderSnapshot {
            x: 1500,
            ..SliderSnapshot::default()
        };
        let err = snapshot.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidSlider(ref msg) if msg.starts_with("x ")));

        let snapshot = SliderSnapshot {
            mvt_direction: 0,
            ..SliderSnapshot::default()
        };
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_validate_drops_id() {
        let snapshot = SliderSnapshot {
            id: Some(SliderId::new(3)),
            x: 40,
            y: 60,
            size: 10,
            ..SliderSnapshot::default()
        };
        let slider = snapshot.validate().unwrap();
        assert!(slider.id().is_none());
        assert_eq!(slider.x(), 40);
        assert_eq!(slider.size(), 10);
    }

    #[test]
    fn test_snapshot_deserialize_defaults() {
        let snapshot: SliderSnapshot = serde_json::from_str(r#"{"x": 5, "y": 6}"#).unwrap();
        assert_eq!(snapshot.id, None);
        assert_eq!(snapshot.size, 50);
        assert_eq!(snapshot.max_travel, 50);
        assert_eq!(snapshot.mvt_direction, 1);
    }

    #[test]
    fn test_patch_touches_only_set_fields() {
        let mut slider = persisted(4);
        slider.set_current_travel(35);
        slider.set_mvt_direction(-1);
        slider.set_dir_change_count(2);

        let patch = SliderPatch {
            x: Some(10),
            size: Some(999),
            ..SliderPatch::default()
        };
        patch.apply_to(&mut slider);

        assert_eq!(slider.x(), 10);
        assert_eq!(slider.y(), 0);
        assert_eq!(slider.size(), 50);
        assert_eq!(slider.current_travel(), 35);
        assert_eq!(slider.mvt_direction(), -1);
        assert_eq!(slider.dir_change_count(), 2);
    }
}
