use anyhow::Result;

use slider_core::{edits, storage::Database, Error, SliderId};

pub async fn run(db: &Database, id: SliderId) -> Result<()> {
    match edits::remove(db, id).await {
        Ok(()) => println!("Removed slider {}", id),
        Err(Error::SliderNotFound(_)) => println!("Slider {} not found.", id),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
