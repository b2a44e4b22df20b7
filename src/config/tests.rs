use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
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
fn resolve_config_path_prefers_cassette_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CASSETTE_CONFIG_PATH", "/tmp/cassette-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/cassette-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("cassette")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("cassette")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_falls_back_to_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state")
            .join("cassette")
            .join("cassette.log")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
tick_ms = 100
quit_fade_out_ms = 0

[playlist]
assets_dir = "/srv/tapes"
extensions = ["ogg"]
artwork_extensions = ["webp"]
recursive = true

[ui]
header_text = "hello"
artist_title_separator = " • "

[mpris]
enabled = false

[logging]
enabled = false
level = "debug"
file = "/tmp/cassette.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CASSETTE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CASSETTE__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 100);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(
        s.playlist.assets_dir.as_deref(),
        Some(std::path::Path::new("/srv/tapes"))
    );
    assert_eq!(s.playlist.extensions, vec!["ogg".to_string()]);
    assert_eq!(s.playlist.artwork_extensions, vec!["webp".to_string()]);
    assert!(s.playlist.recursive);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.artist_title_separator, " • ");
    assert!(!s.mpris.enabled);
    assert!(!s.logging.enabled);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file.as_deref(),
        Some(std::path::Path::new("/tmp/cassette.log"))
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
[audio]
tick_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CASSETTE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CASSETTE__AUDIO__TICK_MS", "500");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 500);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("nope.toml");
    let _g1 = EnvGuard::set("CASSETTE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CASSETTE__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 333);
    assert!(s.mpris.enabled);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_zero_tick_and_empty_extensions() {
    let mut s = Settings::default();
    s.audio.tick_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playlist.extensions = vec![" . ".to_string()];
    assert!(s.validate().is_err());
}
