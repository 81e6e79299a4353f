use anyhow::Result;

use slider_core::{edits, slider::SliderPatch, storage::Database, Error, SliderId};

use crate::UpdateFields;

/// Apply the given fields on top of the stored slider
pub async fn run(db: &Database, id: SliderId, fields: UpdateFields) -> Result<()> {
    let change = SliderPatch {
        x: fields.x,
        y: fields.y,
        size: fields.size,
        max_travel: fields.max_travel,
        current_travel: fields.current_travel,
        mvt_direction: fields.mvt_direction,
        dir_change_count: fields.dir_change_count,
    };

    let slider = match edits::patch(db, id, &change).await {
        Ok(slider) => slider,
        Err(Error::SliderNotFound(_)) => {
            println!("Slider {} not found.", id);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "Slider {}: pos ({}, {}), size {}, max travel {}",
        id,
        slider.x(),
        slider.y(),
        slider.size(),
        slider.max_travel()
    );

    Ok(())
}
