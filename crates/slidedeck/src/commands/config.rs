use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
        ConfigCommands::Path => {
            println!("{}", Config::path()?.display());
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    let settings = config.settings();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("  {}", "(not created yet, showing defaults)".dimmed());
    }
    println!();
    println!("{}", "Effective settings:".bold());
    println!(
        "  {:<30} {}",
        "defaults.theme",
        settings.theme.as_deref().unwrap_or("dark (deck may override)")
    );
    println!("  {:<30} {}", "defaults.windowed", settings.windowed);
    println!(
        "  {:<30} {}s",
        "defaults.transition_duration", settings.timing.duration
    );
    println!(
        "  {:<30} {}",
        "defaults.transition_easing", settings.timing.easing
    );
    println!("  {:<30} {}", "defaults.transition_axis", settings.axis);
    println!(
        "  {:<30} {}",
        "defaults.chrome_height", settings.chrome_height
    );
    println!();
    println!(
        "Change a value with {}",
        "slidedeck config set <key> <value>".cyan()
    );
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(_) if !Config::path()?.exists() => Config::default(),
        Err(e) => return Err(e),
    };
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {} = {} ({})",
        "Saved".green().bold(),
        key,
        value,
        path.display()
    );
    tracing::debug!(key, value, "config updated");
    Ok(())
}
