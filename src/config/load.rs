use std::{env, path::PathBuf};

use crate::error::SettingsError;

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `SCROBDL__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from an optional config file and the environment.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SCROBDL")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject settings the core cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(SettingsError::Invalid("backend.base_url must not be empty".to_string()));
        }
        if self.poller.interval_ms == 0 {
            return Err(SettingsError::Invalid("poller.interval_ms must be >= 1".to_string()));
        }
        let step = self.playback.volume_step;
        if step.is_nan() || step <= 0.0 {
            return Err(SettingsError::Invalid("playback.volume_step must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Resolve the config path from `SCROBDL_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SCROBDL_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/scrobdl/config.toml`, or `~/.config/scrobdl/config.toml`
/// when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("scrobdl").join("config.toml"))
}

/// `$XDG_STATE_HOME/scrobdl/scrobdl.log`, or under `~/.local/state`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("scrobdl").join("scrobdl.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
