use std::path::Path;

use crate::{Error, KubeConfig, ResolvedContext, Result};

/// What `-alias foo` parses into: `-a` followed by the value `lias`.
const SHORT_FLAG_TYPO: &str = "lias";

pub fn validate_alias(alias: &str) -> Result<()> {
    if alias.is_empty() {
        return Err(Error::InvalidAlias("alias must not be empty".into()));
    }
    if alias == SHORT_FLAG_TYPO {
        return Err(Error::InvalidAlias(
            "when using the flag 'alias', please use two dashes '--alias', otherwise use the shortcut '-a'"
                .into(),
        ));
    }
    Ok(())
}

impl KubeConfig {
    /// Renames the current context entry and moves `current-context` with it.
    ///
    /// Fails with [`Error::ContextNotFound`] when `current-context` names no
    /// entry, leaving the document unchanged.
    pub fn rename_current(&mut self, new_alias: &str) -> Result<ResolvedContext> {
        validate_alias(new_alias)?;

        let current = self.current_context_name().to_owned();
        let ctx = self
            .context_mut(&current)
            .ok_or(Error::ContextNotFound { name: current })?;

        ctx.name = new_alias.to_owned();
        let cluster = ctx.cluster_label().to_owned();
        self.set_current_context(new_alias);

        Ok(ResolvedContext {
            alias: new_alias.to_owned(),
            cluster,
        })
    }
}

/// Loads `path`, renames its current context to `new_alias` and writes it back.
pub fn set_alias(path: &Path, new_alias: &str) -> Result<ResolvedContext> {
    let mut kc = KubeConfig::read_from(path)?;
    let previous = kc.current_context_name().to_owned();
    let resolved = kc.rename_current(new_alias)?;
    kc.write_to(path)?;

    tracing::debug!(from = %previous, to = %resolved.alias, "renamed current context");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SRC: &str = r#"contexts:
- context:
    cluster: clusterA
    user: userA
  name: ctx1
- context:
    cluster: clusterB
    user: userB
  name: ctx2
current-context: ctx1
"#;

    #[test]
    fn renames_entry_and_pointer() {
        let mut kc = KubeConfig::from_slice(SRC.as_bytes()).unwrap();

        let resolved = kc.rename_current("newAlias").unwrap();

        assert_eq!(resolved.alias, "newAlias");
        assert_eq!(resolved.cluster, "clusterA");
        assert_eq!(kc.current_context_name(), "newAlias");
        assert_eq!(kc.contexts()[0].name, "newAlias");
        assert_eq!(kc.contexts()[0].cluster_label(), "clusterA");
        assert_eq!(kc.contexts()[1].name, "ctx2");
    }

    #[test]
    fn dangling_pointer_is_rejected_untouched() {
        let mut kc = KubeConfig::from_slice(SRC.as_bytes()).unwrap();
        kc.set_current_context("gone");
        let before = kc.clone();

        let err = kc.rename_current("newAlias").unwrap_err();

        assert!(matches!(err, Error::ContextNotFound { ref name } if name == "gone"));
        assert_eq!(kc, before);
    }

    #[test]
    fn rejects_bad_aliases() {
        assert!(matches!(validate_alias(""), Err(Error::InvalidAlias(_))));
        assert!(matches!(validate_alias("lias"), Err(Error::InvalidAlias(_))));
        assert!(validate_alias("alias").is_ok());
        assert!(validate_alias("nonprod-gke-dev1").is_ok());
    }
}
