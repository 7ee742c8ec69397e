use anyhow::Result;
use std::path::Path;

use crate::config::Config;

pub async fn show_config(path: Option<&Path>) -> Result<()> {
    let config = Config::load(path)?;
    let config_str = toml::to_string_pretty(&config)?;

    println!("Current Configuration");
    println!("────────────────────────────────");
    println!();
    println!("{}", config_str);

    Ok(())
}

pub async fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let config_file = Config::config_file(path)?;

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = Config::default();
    config.save(path)?;

    println!("✓ Configuration initialized at: {}", config_file.display());
    println!();
    println!("You can view it with: form-coach config show");

    Ok(())
}

pub async fn print_path(path: Option<&Path>) -> Result<()> {
    println!("{}", Config::config_file(path)?.display());
    Ok(())
}
