//! Config command - print the effective merged configuration.

use anyhow::{Context, Result};

use crate::config::AppConfig;

/// Prints `config` with defaults filled in as TOML on stdout.
pub fn run(config: AppConfig) -> Result<()> {
    let text = toml::to_string_pretty(&config.with_defaults())
        .context("Failed to serialize configuration")?;
    print!("{text}");
    Ok(())
}
