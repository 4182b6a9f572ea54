use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared::protocol::BACKEND_EVENT_CHANNEL;

pub const DEFAULT_CONFIG_FILE: &str = "replay.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub channel_name: String,
    pub queue_capacity: usize,
    pub handshake_timeout: Duration,
    pub log_filter: String,
    pub print_state: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            channel_name: BACKEND_EVENT_CHANNEL.into(),
            queue_capacity: client_core::listener::DEFAULT_QUEUE_CAPACITY,
            handshake_timeout: client_core::listener::DEFAULT_HANDSHAKE_TIMEOUT,
            log_filter: "info".into(),
            print_state: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    channel_name: Option<String>,
    queue_capacity: Option<usize>,
    handshake_timeout_ms: Option<u64>,
    log_filter: Option<String>,
    print_state: Option<bool>,
}

/// Defaults, then the TOML file, then `APP__*` environment variables.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file_cfg = match config_path {
        Some(path) => Some(read_file_settings(path)?),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Some(read_file_settings(Path::new(DEFAULT_CONFIG_FILE))?)
        }
        None => None,
    };

    if let Some(file_cfg) = file_cfg {
        if let Some(v) = file_cfg.channel_name {
            settings.channel_name = v;
        }
        if let Some(v) = file_cfg.queue_capacity {
            settings.queue_capacity = v;
        }
        if let Some(v) = file_cfg.handshake_timeout_ms {
            settings.handshake_timeout = Duration::from_millis(v);
        }
        if let Some(v) = file_cfg.log_filter {
            settings.log_filter = v;
        }
        if let Some(v) = file_cfg.print_state {
            settings.print_state = v;
        }
    }

    if let Some(v) = env("APP__CHANNEL_NAME") {
        settings.channel_name = v;
    }
    if let Some(v) = env("APP__QUEUE_CAPACITY") {
        settings.queue_capacity = v
            .parse()
            .with_context(|| format!("APP__QUEUE_CAPACITY is not a number: '{v}'"))?;
    }
    if let Some(v) = env("APP__HANDSHAKE_TIMEOUT_MS") {
        let millis: u64 = v
            .parse()
            .with_context(|| format!("APP__HANDSHAKE_TIMEOUT_MS is not a number: '{v}'"))?;
        settings.handshake_timeout = Duration::from_millis(millis);
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = env("APP__PRINT_STATE") {
        settings.print_state = matches!(v.trim(), "1" | "true" | "yes");
    }

    if settings.queue_capacity == 0 {
        anyhow::bail!("queue_capacity must be at least 1");
    }

    Ok(settings)
}

fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
