//! Core live reload types: lifecycle, settings and the running handle.

mod builder;
mod guard;
mod handle;
mod settings;

pub use builder::LiveReloadBuilder;
pub use guard::InstanceGuard;
pub use handle::LiveReload;
pub use settings::{DEFAULT_ENDPOINT, LiveReloadSettings};
