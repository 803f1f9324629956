use std::{io, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not determine the home directory")]
    Environment,

    #[error("could not find kube config at {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("could not read kube config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse kube config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("could not encode kube config")]
    Serialize(#[source] serde_yaml::Error),

    #[error("could not write kube config {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("current context {name:?} has no matching entry in contexts")]
    ContextNotFound { name: String },

    #[error("could not render output")]
    Render(#[from] serde_json::Error),

    #[error("invalid alias: {0}")]
    InvalidAlias(String),

    #[error("settings file {}: {reason}", path.display())]
    Settings { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
