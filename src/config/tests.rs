use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
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
fn resolve_config_path_prefers_musika_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("MUSIKA_CONFIG_PATH", "/tmp/musika-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/musika-test-config.toml")
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
            .join("musika")
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
            .join("musika")
            .join("config.toml")
    );
}

#[test]
fn default_library_ships_four_tracks() {
    let s = LibrarySettings::default();
    let ids: Vec<&str> = s.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["karera", "multo", "cant_stop", "you_be_in_my_heart"]
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
[remote]
enabled = false
term = "opm"
limit = 8
timeout_secs = 3

[playback]
shuffle = true
loop_enabled = true

[controls]
skip_seconds = 15

[ui]
header_text = "hello"

[[library.tracks]]
id = "demo"
title = "Demo Song"
author = "Someone"
file = "/music/demo.mp3"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MUSIKA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("MUSIKA__REMOTE__LIMIT");

    let s = Settings::load().unwrap();
    assert!(!s.remote.enabled);
    assert_eq!(s.remote.term, "opm");
    assert_eq!(s.remote.limit, 8);
    assert_eq!(s.remote.timeout_secs, 3);
    // Unset fields keep their defaults.
    assert_eq!(s.remote.endpoint, "https://itunes.apple.com/search");
    assert!(s.playback.shuffle);
    assert!(s.playback.loop_enabled);
    assert_eq!(s.controls.skip_seconds, 15);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.library.tracks.len(), 1);
    assert_eq!(s.library.tracks[0].id, "demo");
    assert_eq!(s.library.tracks[0].file, "/music/demo.mp3");
    assert_eq!(s.library.tracks[0].thumbnail, None);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[remote]
term = "pop"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MUSIKA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("MUSIKA__REMOTE__TERM", "rock");

    let s = Settings::load().unwrap();
    assert_eq!(s.remote.term, "rock");
}

#[test]
fn validate_rejects_zero_result_limit() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());
    s.remote.limit = 0;
    assert!(s.validate().is_err());
}
