use anyhow::Result;

use slider_core::AppConfig;

pub fn run(config: &AppConfig) -> Result<()> {
    config.save()?;
    println!("Wrote configuration to {}", AppConfig::config_path().display());
    println!("  Database: {}", config.database_path().display());
    println!("  Change rate: {} ticks/s", config.game.change_rate);
    Ok(())
}
