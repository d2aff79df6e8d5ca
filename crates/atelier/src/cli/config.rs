//! Configuration display command handler.

use atelier_config::AtelierConfig;

/// Prints the merged configuration.
pub fn show_config() -> anyhow::Result<()> {
    let config = AtelierConfig::load()?;
    print!("{}", config.to_toml()?);
    Ok(())
}
