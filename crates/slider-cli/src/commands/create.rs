use anyhow::Result;

use slider_core::{edits, storage::Database, SliderSnapshot};

pub async fn run(db: &Database, x: i32, y: i32, size: i32, max_travel: i32) -> Result<()> {
    let snapshot = SliderSnapshot {
        x,
        y,
        size,
        max_travel,
        ..SliderSnapshot::default()
    };

    let slider = edits::submit(db, &snapshot).await?.into_slider();
    match slider.id() {
        Some(id) => println!("Created slider {} at ({}, {})", id, slider.x(), slider.y()),
        None => println!("Created slider at ({}, {})", slider.x(), slider.y()),
    }

    Ok(())
}
