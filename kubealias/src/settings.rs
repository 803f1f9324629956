//! The tool's own settings file, `~/.gke-alias/config.yml` by default.
//!
//! This is unrelated to the kube config. It is created empty on first use and
//! may carry a `log-level` filter directive.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{Error, Result};

pub const SETTINGS_DIR: &str = ".gke-alias";
pub const SETTINGS_FILE: &str = "config.yml";

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Settings {
    /// Reads the settings at `path`, falling back to defaults when the file
    /// is unreadable, empty or malformed.
    pub fn load(path: &Path) -> Settings {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "could not read settings");
                return Settings::default();
            }
        };

        if data.trim().is_empty() {
            return Settings::default();
        }

        serde_yaml::from_str(&data).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "ignoring malformed settings");
            Settings::default()
        })
    }
}

fn settings_error(path: &Path, reason: impl Into<String>) -> Error {
    Error::Settings {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Creates an empty, owner-only file at `path` unless something is already there.
pub fn create_restricted(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options
        .open(path)
        .map_err(|e| settings_error(path, format!("unable to create the settings file: {e}")))?;
    Ok(())
}

/// Makes sure a settings file exists and returns its path.
///
/// An explicit path is created if missing. Otherwise the `.gke-alias`
/// directory under `home` is created as needed; a plain file in its place is
/// an error.
pub fn bootstrap(explicit: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        create_restricted(path)?;
        return Ok(path.to_path_buf());
    }

    let dir = home.ok_or(Error::Environment)?.join(SETTINGS_DIR);
    if !dir.exists() {
        fs::create_dir(&dir)
            .map_err(|e| settings_error(&dir, format!("unable to create directory: {e}")))?;
    }
    if !dir.is_dir() {
        return Err(settings_error(
            &dir,
            "path is a file and not a directory, please remove the .gke-alias file",
        ));
    }

    let path = dir.join(SETTINGS_FILE);
    create_restricted(&path)?;
    Ok(path)
}
