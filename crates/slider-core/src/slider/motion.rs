//! One-dimensional damped oscillation applied to a slider each tick.
//!
//! `current_travel` accumulates `TRAVEL_SPEED` per tick in the current
//! direction. Reaching `max_travel` in either direction reverses the slider;
//! every `MAX_DIR_CHANGES` reversals the envelope shrinks by `DECREASE_RATE`.
//! Position (`x`, `y`) is not touched.

use super::models::Slider;

/// Travel added per tick, independent of slider size
pub const TRAVEL_SPEED: i32 = 5;
/// Reversals needed before the envelope shrinks
pub const MAX_DIR_CHANGES: i32 = 10;
/// Envelope shrink applied after `MAX_DIR_CHANGES` reversals
pub const DECREASE_RATE: i32 = 1;

/// What a single `advance` did to a slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Envelope exhausted (`max_travel <= 0`); nothing changed
    Inert,
    /// Travel accumulated without hitting the envelope
    Moved,
    /// Envelope reached; direction flipped
    Reversed,
    /// Direction flipped and the envelope shrank
    Decayed,
}

impl Step {
    pub fn is_reversal(self) -> bool {
        matches!(self, Step::Reversed | Step::Decayed)
    }
}

/// Apply one time step to `slider`
pub fn advance(slider: &mut Slider) -> Step {
    if slider.max_travel <= 0 {
        return Step::Inert;
    }

    // Keep the direction a unit sign even if something arbitrary was written
    // through the unchecked setter.
    let direction = if slider.mvt_direction < 0 { -1 } else { 1 };

    slider.current_travel = slider
        .current_travel
        .saturating_add(direction * TRAVEL_SPEED);

    if slider.current_travel.unsigned_abs() < slider.max_travel.unsigned_abs() {
        slider.mvt_direction = direction;
        return Step::Moved;
    }

    slider.mvt_direction = -direction;
    slider.dir_change_count = slider.dir_change_count.saturating_add(1);

    if slider.dir_change_count >= MAX_DIR_CHANGES {
        slider.max_travel -= DECREASE_RATE;
        slider.dir_change_count = 0;
        return Step::Decayed;
    }

    Step::Reversed
}
