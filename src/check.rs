use std::fs;
use std::path::Path;

use crate::config::{Config, API_KEY_ENV};

pub fn perform_startup_checks(config_path: &str) {
    log::info!("Performing startup checks...");
    check_and_generate_config(config_path);
    log::info!("Startup checks completed.");
}

fn check_and_generate_config(config_path: &str) {
    if Path::new(config_path).exists() {
        log::info!("CHECK: {} found.", config_path);
        return;
    }

    log::warn!("{} not found. Generating default config...", config_path);
    let default_config = match Config::default().to_yaml() {
        Ok(yaml) => yaml,
        Err(e) => {
            log::error!("Failed to serialize default config: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = fs::write(config_path, default_config) {
        log::error!("Failed to create default {}: {}", config_path, e);
        std::process::exit(1);
    }

    log::info!(
        "Default {} created. Add a YouTube API key under api.keys.active or set {}.",
        config_path,
        API_KEY_ENV
    );
}

/// Warns when no usable key is configured; `/convert` answers 500 until one is.
pub fn check_api_key(config: &Config) {
    if config.has_api_key() {
        log::info!(
            "CHECK: {} YouTube API key(s) configured.",
            config.api.keys.active.len()
        );
    } else {
        log::warn!(
            "No YouTube API key configured. Set {} or api.keys.active in the config file.",
            API_KEY_ENV
        );
    }
}
