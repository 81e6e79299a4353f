use anyhow::Result;

use slider_core::{
    storage::{Database, SliderRepository},
    Slider, SliderId,
};

pub async fn run(db: &Database, json: bool) -> Result<()> {
    let sliders = SliderRepository::new(db).list_all().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sliders)?);
        return Ok(());
    }

    if sliders.is_empty() {
        println!("No sliders yet.");
        println!("\nTo create one, run:");
        println!("  slider create -x <x> -y <y>");
        return Ok(());
    }

    println!("Sliders ({}):\n", sliders.len());
    print_sliders(&sliders);

    Ok(())
}

pub async fn show(db: &Database, id: SliderId) -> Result<()> {
    match SliderRepository::new(db).find_by_id(id).await? {
        Some(slider) => println!("{}", serde_json::to_string_pretty(&slider)?),
        None => println!("Slider {} not found.", id),
    }

    Ok(())
}

pub async fn count(db: &Database) -> Result<()> {
    println!("{}", SliderRepository::new(db).count().await?);
    Ok(())
}

pub async fn range(db: &Database, from: u32, to: u32) -> Result<()> {
    let sliders = SliderRepository::new(db).find_range(from, to).await?;
    print_sliders(&sliders);
    Ok(())
}

fn print_sliders(sliders: &[Slider]) {
    for slider in sliders {
        let direction = if slider.mvt_direction() < 0 { "<-" } else { "->" };
        println!(
            "  {} at ({}, {}) size {}  travel {:>4}/{} {}  reversals {}",
            slider,
            slider.x(),
            slider.y(),
            slider.size(),
            slider.current_travel(),
            slider.max_travel(),
            direction,
            slider.dir_change_count()
        );
    }
}
