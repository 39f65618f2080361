//! Live reload settings loaded from files and environment variables.

use crate::error::Result;
use crate::notify::DEFAULT_DEBOUNCE;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default streaming endpoint.
pub const DEFAULT_ENDPOINT: &str = "/live-reload";

/// Settings for a live reload instance.
///
/// Missing fields take their defaults, so a settings file only needs to name
/// what it changes.
///
/// # Examples
///
/// ```rust,no_run
/// use live_reload::{LiveReload, LiveReloadSettings};
///
/// # fn example() -> live_reload::Result<()> {
/// // dev.toml:
/// //   paths = ["templates", "static"]
/// //   debounce_ms = 200
/// let settings = LiveReloadSettings::load(Some("dev.toml".as_ref()), Some("LIVE_RELOAD"))?;
///
/// let live = LiveReload::builder()
///     .with_settings(settings)
///     .on_change(live_reload::log_change)
///     .start()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LiveReloadSettings {
    /// URL path the streaming endpoint is served on
    pub endpoint: String,
    /// Root directories watched recursively
    pub paths: Vec<PathBuf>,
    /// Quiet period before a burst of changes triggers a reload, in milliseconds
    pub debounce_ms: u64,
    /// Whether directories starting with `.` are watched too
    pub include_hidden: bool,
}

impl Default for LiveReloadSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            paths: Vec::new(),
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            include_hidden: false,
        }
    }
}

impl LiveReloadSettings {
    /// Load settings with standard precedence: defaults, then the file, then
    /// environment variables.
    ///
    /// The file format (YAML, TOML or JSON) is detected from its extension.
    /// Environment variables are read as `{PREFIX}_{FIELD}`, e.g.
    /// `LIVE_RELOAD_DEBOUNCE_MS=250`; `{PREFIX}_PATHS` takes a comma separated
    /// list.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value has the wrong
    /// type.
    pub fn load(file: Option<&Path>, env_prefix: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        if let Some(prefix) = env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("paths"),
            );
        }

        let settings = builder.build()?.try_deserialize::<Self>()?;
        Ok(settings)
    }

    /// The debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
