pub mod document;
pub mod error;
pub mod output;
pub mod persist;
pub mod rename;
pub mod resolve;
pub mod settings;
pub mod source;
pub mod version;

use std::path::PathBuf;

pub use document::KubeConfig;
pub use error::{Error, Result};
pub use output::OutputFormat;
pub use resolve::ResolvedContext;

/// Per-invocation state handed to `get` and `set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub kubeconfig: PathBuf,
    pub verbose: bool,
}

impl Invocation {
    pub fn from_env(verbose: bool) -> Result<Invocation> {
        Ok(Invocation {
            kubeconfig: source::from_env()?,
            verbose,
        })
    }

    /// Resolves the current context and formats it for printing.
    pub fn get(&self, format: OutputFormat) -> Result<String> {
        let resolved = resolve::get_current(&self.kubeconfig)?;
        format.render(&resolved)
    }

    /// Renames the current context and returns the confirmation line.
    pub fn set(&self, new_alias: &str) -> Result<String> {
        let resolved = rename::set_alias(&self.kubeconfig, new_alias)?;
        if self.verbose {
            tracing::info!("Successfully set current context to alias {}", resolved.alias);
        }
        resolved.to_json_line()
    }
}
