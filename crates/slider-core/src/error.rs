use thiserror::Error;

use crate::slider::SliderId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Slider not found: {0}")]
    SliderNotFound(SliderId),

    #[error("Slider {id} was modified concurrently (expected version {expected})")]
    VersionConflict { id: SliderId, expected: i64 },

    #[error("Slider id in body ({body:?}) does not match requested id ({requested})")]
    IdMismatch {
        requested: SliderId,
        body: Option<SliderId>,
    },

    #[error("Invalid slider: {0}")]
    InvalidSlider(String),

    #[error("Invalid range: from {from} to {to}")]
    InvalidRange { from: u32, to: u32 },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
