use serde::Serialize;

use crate::{output, Result};

fn injected(value: Option<&'static str>) -> &'static str {
    value.unwrap_or_default()
}

/// Build metadata injected through `GKE_ALIAS_SEMVER`, `GKE_ALIAS_GIT_COMMIT`
/// and `GKE_ALIAS_BUILD_DATE` at compile time.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ClientVersion {
    pub sem_ver: &'static str,
    pub git_commit: &'static str,
    pub build_date: &'static str,
}

impl ClientVersion {
    pub fn current() -> Self {
        Self {
            sem_ver: injected(option_env!("GKE_ALIAS_SEMVER")),
            git_commit: injected(option_env!("GKE_ALIAS_GIT_COMMIT")),
            build_date: injected(option_env!("GKE_ALIAS_BUILD_DATE")),
        }
    }
}

#[derive(Serialize)]
struct Client {
    #[serde(rename = "Client")]
    client: ClientVersion,
}

#[derive(Serialize)]
struct VersionInfo {
    #[serde(rename = "VersionInfo")]
    info: Client,
}

/// `{"VersionInfo": {"Client": {"SemVer": .., "GitCommit": .., "BuildDate": ..}}}`
pub fn render(version: ClientVersion) -> Result<String> {
    output::to_line(&VersionInfo {
        info: Client { client: version },
    })
}
