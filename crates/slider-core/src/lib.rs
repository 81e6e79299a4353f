pub mod config;
pub mod edits;
pub mod error;
pub mod scheduler;
pub mod slider;
pub mod storage;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use slider::{Slider, SliderId, SliderSnapshot};
