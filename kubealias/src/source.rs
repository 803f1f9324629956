//! Picks the kube config file an invocation reads and writes.

use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

pub fn kube_dir(home: &Path) -> PathBuf {
    home.join(".kube")
}

/// Chooses the config path from a `KUBECONFIG`-style override or the home
/// directory.
///
/// Only the first entry of a colon separated override is used; multiple
/// files are never merged. The override is taken verbatim and not checked
/// for existence, the read that follows reports that. The default
/// `<home>/.kube/config` must exist.
pub fn resolve_path(kubeconfig: Option<&str>, home: Option<&Path>) -> Result<PathBuf> {
    if let Some(list) = kubeconfig.filter(|v| !v.is_empty()) {
        let first = list.split(':').next().unwrap_or(list);
        tracing::debug!(path = first, "using {KUBECONFIG_ENV}");
        return Ok(PathBuf::from(first));
    }

    let home = home.ok_or(Error::Environment)?;
    let path = kube_dir(home).join("config");
    if !path.exists() {
        return Err(Error::ConfigNotFound { path });
    }
    tracing::debug!(path = %path.display(), "using default kube config");
    Ok(path)
}

pub fn from_env() -> Result<PathBuf> {
    let kubeconfig = env::var(KUBECONFIG_ENV).ok();
    resolve_path(kubeconfig.as_deref(), dirs::home_dir().as_deref())
}
