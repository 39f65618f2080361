//! Integration tests for loading settings from files and the environment.

#![allow(unsafe_code)] // For env var manipulation in tests

use live_reload::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[cfg(feature = "toml")]
#[test]
fn test_env_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("live.toml");
    fs::write(
        &path,
        r#"
endpoint = "/from-file"
paths = ["templates"]
debounce_ms = 250
"#,
    )
    .unwrap();

    unsafe {
        std::env::set_var("LRTEST_OVERRIDE_DEBOUNCE_MS", "50");
        std::env::set_var("LRTEST_OVERRIDE_INCLUDE_HIDDEN", "true");
    }

    let settings = LiveReloadSettings::load(Some(&path), Some("LRTEST_OVERRIDE")).unwrap();

    unsafe {
        std::env::remove_var("LRTEST_OVERRIDE_DEBOUNCE_MS");
        std::env::remove_var("LRTEST_OVERRIDE_INCLUDE_HIDDEN");
    }

    assert_eq!(settings.endpoint, "/from-file");
    assert_eq!(settings.paths, vec![PathBuf::from("templates")]);
    assert_eq!(settings.debounce(), Duration::from_millis(50));
    assert!(settings.include_hidden);
}

#[test]
fn test_env_paths_list() {
    unsafe {
        std::env::set_var("LRTEST_PATHS_PATHS", "templates,static");
        std::env::set_var("LRTEST_PATHS_ENDPOINT", "/dev/events");
    }

    let settings = LiveReloadSettings::load(None, Some("LRTEST_PATHS")).unwrap();

    unsafe {
        std::env::remove_var("LRTEST_PATHS_PATHS");
        std::env::remove_var("LRTEST_PATHS_ENDPOINT");
    }

    assert_eq!(
        settings.paths,
        vec![PathBuf::from("templates"), PathBuf::from("static")]
    );
    assert_eq!(settings.endpoint, "/dev/events");
}

#[cfg(feature = "json")]
#[tokio::test]
async fn test_settings_drive_builder() {
    let temp_dir = TempDir::new().unwrap();
    let templates = temp_dir.path().join("templates");
    fs::create_dir_all(templates.join("pages")).unwrap();

    let path = temp_dir.path().join("live.json");
    fs::write(
        &path,
        format!(
            r#"{{ "endpoint": "/dev/reload", "paths": [{:?}], "debounce_ms": 20 }}"#,
            templates.display().to_string()
        ),
    )
    .unwrap();

    let settings = LiveReloadSettings::load(Some(&path), None).unwrap();
    let live = LiveReload::builder()
        .guard(InstanceGuard::new())
        .with_settings(settings)
        .on_change(log_change)
        .start()
        .unwrap();

    let root = templates.canonicalize().unwrap();
    assert_eq!(live.endpoint(), "/dev/reload");
    assert_eq!(live.watched_dirs(), vec![root.clone(), root.join("pages")]);

    live.shutdown().await;
}
