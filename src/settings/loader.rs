//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If
//! several files are present the first one (by file name) that parses wins.
//! With no parseable file the defaults are used.
use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use crate::settings::Settings;
use bevy::log::{info, warn};
use bevy::prelude::{Res, ResMut, Resource};

pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher(pub crate::ron::RonWatcher);

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher(crate::ron::RonWatcher::stub())
    }
}

/// Load settings from `path` (directory), falling back to `Settings::default()`.
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    items.into_iter().next().unwrap_or_default()
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns the `notify::Error` from the underlying watcher.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(SettingsWatcher)
}

/// Like [`setup_settings_watcher`], logging the failure and returning a stub.
#[must_use]
pub fn settings_watcher_or_stub(path: &str) -> SettingsWatcher {
    setup_settings_watcher(path).unwrap_or_else(|e| {
        warn!("settings hot-reload disabled for {path}: {e}");
        SettingsWatcher::stub()
    })
}

/// Reload the `Settings` resource when the watcher reports a change.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if watcher.0.take_changed() {
        info!("settings changed, reloading");
        *settings = load_settings_from_dir(SETTINGS_DIR);
    }
}
