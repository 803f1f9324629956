use std::path::Path;

use crate::{KubeConfig, Result};

/// The active context's alias paired with the cluster label it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    pub alias: String,
    pub cluster: String,
}

impl KubeConfig {
    /// Follows `current-context` to its entry in `contexts`.
    ///
    /// A dangling pointer is not an error here: the cluster label is left
    /// empty.
    pub fn current(&self) -> ResolvedContext {
        let alias = self.current_context_name().to_owned();
        let cluster = match self.context(&alias) {
            Some(ctx) => ctx.cluster_label().to_owned(),
            None => {
                tracing::warn!(context = %alias, "current context has no matching entry");
                String::new()
            }
        };
        ResolvedContext { alias, cluster }
    }
}

/// Loads `path` and resolves its current context.
pub fn get_current(path: &Path) -> Result<ResolvedContext> {
    Ok(KubeConfig::read_from(path)?.current())
}
