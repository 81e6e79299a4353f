pub mod models;
pub mod motion;

pub use models::{
    Slider, SliderId, SliderPatch, SliderSnapshot, INITIAL_SIZE, MAX_TRAVEL_LIMIT, SIZE_LIMIT,
    X_LIMIT, Y_LIMIT,
};
pub use motion::{advance, Step, DECREASE_RATE, MAX_DIR_CHANGES, TRAVEL_SPEED};
