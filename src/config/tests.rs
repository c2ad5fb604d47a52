use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use crate::error::SettingsError;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_scrobdl_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SCROBDL_CONFIG_PATH", "/tmp/scrobdl-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/scrobdl-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("scrobdl")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("scrobdl")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_state_dir() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/scrobdl/scrobdl.log")
    );
}

#[test]
fn defaults_match_backend_contract() {
    let s = Settings::default();
    assert_eq!(s.backend.base_url, "http://localhost:8000");
    assert_eq!(s.backend.jobs_path, "/api/jobs");
    assert_eq!(s.backend.audio_route, "/api/audio");
    assert_eq!(s.poller.interval().as_millis(), 2000);
    assert_eq!(s.playback.initial_volume, 1.0);
    assert_eq!(s.logging.level, "info");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[backend]
base_url = "http://nas.local:8080"
timeout_ms = 2500

[poller]
interval_ms = 500

[playback]
initial_volume = 0.4
volume_step = 0.1

[controls]
scrub_seconds = 9

[ui]
username = "wife5711"
header_text = "hello"

[logging]
level = "debug"
file = "/tmp/scrobdl.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SCROBDL_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("SCROBDL__POLLER__INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.backend.base_url, "http://nas.local:8080");
    assert_eq!(s.backend.timeout().as_millis(), 2500);
    // Unset keys keep their defaults.
    assert_eq!(s.backend.download_path, "/download");
    assert_eq!(s.poller.interval_ms, 500);
    assert_eq!(s.playback.initial_volume, 0.4);
    assert_eq!(s.playback.volume_step, 0.1);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.ui.username, "wife5711");
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file,
        Some(std::path::PathBuf::from("/tmp/scrobdl.log"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[poller]
interval_ms = 2000
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SCROBDL_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("SCROBDL__POLLER__INTERVAL_MS", "750");

    let s = Settings::load().unwrap();
    assert_eq!(s.poller.interval_ms, 750);
}

#[test]
fn missing_config_file_gives_defaults() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "SCROBDL_CONFIG_PATH",
        dir.path().join("nope.toml").to_str().unwrap(),
    );
    let _g2 = EnvGuard::remove("SCROBDL__POLLER__INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.poller.interval_ms, 2000);
    assert_eq!(s.backend.scrobbles_path, "/scrobbles");
}

#[test]
fn validate_rejects_unusable_values() {
    let mut s = Settings::default();
    s.poller.interval_ms = 0;
    assert!(matches!(s.validate(), Err(SettingsError::Invalid(m)) if m.contains("interval_ms")));

    let mut s = Settings::default();
    s.backend.base_url = "  ".to_string();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.volume_step = 0.0;
    assert!(s.validate().is_err());
}
