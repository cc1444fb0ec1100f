//! Utilities for loading RON files and watching directories for changes.
//!
//! This module provides a small helper for reading RON files from disk
//! and a filesystem watcher resource that sets a shared boolean when files
//! change. The watcher backs hot-reloading of the game settings.

use bevy::log::warn;
use bevy::prelude::Resource;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Errors produced while reading a single RON file.
#[derive(Debug, thiserror::Error)]
pub enum RonError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Resource)]
/// File-watcher resource for RON hot-reload.
pub struct RonWatcher {
    pub changed: Arc<Mutex<bool>>, // Shared boolean set to `true` when watched files change.
    _watcher: Option<notify::RecommendedWatcher>, // kept alive for the lifetime of the resource
}

impl RonWatcher {
    /// Create a stub `RonWatcher` that does not have an active OS watcher.
    ///
    /// Used as a fallback when watcher creation fails (missing directory,
    /// platform without notify support).
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(Mutex::new(false)),
            _watcher: None,
        }
    }

    /// Read and clear the changed flag. A poisoned mutex is recovered since the
    /// flag is a plain bool.
    pub fn take_changed(&self) -> bool {
        let mut flag = match self.changed.lock() {
            Ok(flag) => flag,
            Err(poisoned) => {
                warn!("ron watcher mutex poisoned, recovering");
                poisoned.into_inner()
            }
        };
        std::mem::replace(&mut *flag, false)
    }
}

/// Read one RON file and deserialize it into `T`.
///
/// # Errors
/// Returns [`RonError::Io`] if the file cannot be read and
/// [`RonError::Parse`] if its contents are not a valid `T`.
pub fn load_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T, RonError> {
    let content = std::fs::read_to_string(path).map_err(|source| RonError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str::<T>(&content).map_err(|source| RonError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// Files that fail to parse are skipped with a warning. A missing directory
/// yields an empty `Vec`. Entries are visited in file name order so the result
/// is stable across platforms.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &str) -> Vec<T> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    paths.sort();

    let mut items = Vec::new();
    for p in paths {
        match load_ron_file::<T>(&p) {
            Ok(item) => items.push(item),
            Err(e) => warn!("{e}"),
        }
    }
    items
}

/// Create a `RonWatcher` that watches a directory for modifications.
///
/// The returned watcher's `changed` flag is set when a modify event under the
/// watched directory is observed.
///
/// # Errors
/// Returns a `notify::Error` if the underlying file-watcher cannot be
/// created or cannot be registered for the provided path.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(Mutex::new(false));
    let changed_clone = changed.clone();
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    let p_canon = std::fs::canonicalize(p).unwrap_or_else(|_| p.clone());
                    p_canon.starts_with(&watched_path)
                });
                if relevant {
                    match changed_clone.lock() {
                        Ok(mut flag) => *flag = true,
                        Err(poisoned) => *poisoned.into_inner() = true,
                    }
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        speed: f32,
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lantern-ron-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_directory_loads_nothing() {
        let items: Vec<Sample> = load_ron_files("definitely/not/a/real/dir");
        assert!(items.is_empty());
    }

    #[test]
    fn bad_files_are_skipped() {
        let dir = temp_dir("skip");
        std::fs::write(dir.join("a.ron"), "(speed: 2.5)").unwrap();
        std::fs::write(dir.join("b.ron"), "(speed: \"fast\")").unwrap();
        std::fs::write(dir.join("c.txt"), "(speed: 9.0)").unwrap();

        let items: Vec<Sample> = load_ron_files(dir.to_str().unwrap());
        assert_eq!(items, vec![Sample { speed: 2.5 }]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = temp_dir("err");
        let file = dir.join("broken.ron");
        std::fs::write(&file, "(speed: ").unwrap();

        let err = load_ron_file::<Sample>(&file).unwrap_err();
        assert!(matches!(err, RonError::Parse { .. }));
        assert!(err.to_string().contains("broken.ron"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn stub_flag_clears_after_take() {
        let watcher = RonWatcher::stub();
        *watcher.changed.lock().unwrap() = true;
        assert!(watcher.take_changed());
        assert!(!watcher.take_changed());
    }
}
