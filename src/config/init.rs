// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes a cdrelease.yml template into a directory.

use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, RawConfig};

pub fn init_config(dir: &Path, application: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = RawConfig::template();
    if let Some(name) = application {
        if name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "application name cannot be empty".to_string(),
            ));
        }
        config.application_name = Some(name.to_string());
    }

    let yaml = serde_yaml::to_string(&config)?;
    std::fs::write(&config_path, yaml)?;
    tracing::info!(path = %config_path.display(), "wrote configuration template");

    Ok(())
}
