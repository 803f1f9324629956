//! Typed model of a kubeconfig file.
//!
//! Only the fields needed to find the current context are interpreted. Every
//! level keeps a flattened [`Mapping`] of the keys it does not model, and every
//! optional key remembers whether it was missing or an explicit `null`, so a
//! load followed by a save writes back what it read.

use std::{fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value as YamlValue};

use crate::{persist, Error, Result};

/// A key that is missing (`None`), present as `null` (`Some(None)`) or set.
pub type Nullable<T> = Option<Option<T>>;

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The value of a [`Nullable`] key, if it has one.
pub fn value<T>(field: &Nullable<T>) -> Option<&T> {
    field.as_ref().and_then(Option::as_ref)
}

fn items<T>(field: &Nullable<Vec<T>>) -> &[T] {
    value(field).map(Vec::as_slice).unwrap_or_default()
}

// region: Context
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ContextSpec {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub cluster: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub namespace: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub user: Nullable<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Context {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub context: Nullable<ContextSpec>,
    pub name: String,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Context {
    /// The `cluster` this context points at, or `""` when it has none.
    pub fn cluster_label(&self) -> &str {
        value(&self.context)
            .and_then(|spec| value(&spec.cluster))
            .map(String::as_str)
            .unwrap_or_default()
    }
}
// endregion

// region: Cluster
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterSpec {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub certificate_authority_data: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub server: Nullable<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cluster {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub cluster: Nullable<ClusterSpec>,
    pub name: String,
    #[serde(flatten)]
    pub extra: Mapping,
}
// endregion

// region: User
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct AuthProviderConfig {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub access_token: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub cmd_args: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub cmd_path: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub expiry: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub expiry_key: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub token_key: Nullable<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AuthProvider {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub config: Nullable<AuthProviderConfig>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Nullable<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExecEnvVar {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub value: Nullable<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExecConfig {
    #[serde(
        rename = "apiVersion",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_version: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub args: Nullable<Vec<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub command: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub env: Nullable<Vec<ExecEnvVar>>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct UserSpec {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub auth_provider: Nullable<AuthProvider>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub client_certificate_data: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub client_key_data: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub exec: Nullable<ExecConfig>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub token: Nullable<String>,
    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub user: Nullable<UserSpec>,
    #[serde(flatten)]
    pub extra: Mapping,
}
// endregion

// region: Common
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct KubeConfig {
    #[serde(
        rename = "apiVersion",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_version: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub clusters: Nullable<Vec<Cluster>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub contexts: Nullable<Vec<Context>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub current_context: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub kind: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub preferences: Nullable<YamlValue>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub users: Nullable<Vec<User>>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl KubeConfig {
    pub fn from_slice(data: &[u8]) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_slice(data)
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<KubeConfig> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| Error::read(path, source))?;
        let kc = Self::from_slice(&data).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), contexts = kc.contexts().len(), "loaded kube config");
        Ok(kc)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Error::Serialize)
    }

    /// Encodes the document and atomically replaces `path` with it.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let encoded = self.to_yaml()?;
        persist::write_atomic(path, encoded.as_bytes())?;
        tracing::debug!(path = %path.display(), "saved kube config");
        Ok(())
    }

    pub fn clusters(&self) -> &[Cluster] {
        items(&self.clusters)
    }

    pub fn contexts(&self) -> &[Context] {
        items(&self.contexts)
    }

    pub fn users(&self) -> &[User] {
        items(&self.users)
    }

    /// `current-context`, or `""` when it is missing or null.
    pub fn current_context_name(&self) -> &str {
        value(&self.current_context)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn set_current_context(&mut self, name: &str) {
        self.current_context = Some(Some(name.to_owned()));
    }

    /// First context entry named `name`.
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts().iter().find(|ctx| ctx.name == name)
    }

    pub fn context_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts
            .as_mut()
            .and_then(Option::as_mut)?
            .iter_mut()
            .find(|ctx| ctx.name == name)
    }
}
// endregion

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GKE: &str = r#"apiVersion: v1
clusters:
- cluster:
    certificate-authority-data: Q0VSVA==
    server: https://10.0.0.1
  name: gke_proj_us-east1_dev1
contexts:
- context:
    cluster: gke_proj_us-east1_dev1
    user: gke_proj_us-east1_dev1
  name: dev1
current-context: dev1
kind: Config
preferences: {}
users:
- name: gke_proj_us-east1_dev1
  user:
    auth-provider:
      config:
        cmd-args: config config-helper --format=json
        cmd-path: /usr/bin/gcloud
        expiry-key: '{.credential.token_expiry}'
        token-key: '{.credential.access_token}'
      name: gcp
"#;

    fn text(field: &Nullable<String>) -> Option<&str> {
        value(field).map(String::as_str)
    }

    #[test]
    fn parses_gke_config() {
        let kc = KubeConfig::from_slice(GKE.as_bytes()).unwrap();

        assert_eq!(text(&kc.api_version), Some("v1"));
        assert_eq!(text(&kc.kind), Some("Config"));
        assert_eq!(kc.current_context_name(), "dev1");
        let cluster = value(&kc.clusters()[0].cluster).unwrap();
        assert_eq!(text(&cluster.server), Some("https://10.0.0.1"));
        assert_eq!(kc.contexts()[0].cluster_label(), "gke_proj_us-east1_dev1");

        let user = value(&kc.users()[0].user).unwrap();
        let provider = value(&user.auth_provider).unwrap();
        assert_eq!(text(&provider.name), Some("gcp"));
        assert_eq!(
            text(&value(&provider.config).unwrap().cmd_path),
            Some("/usr/bin/gcloud")
        );
    }

    #[test]
    fn canonical_document_is_stable() {
        let kc = KubeConfig::from_slice(GKE.as_bytes()).unwrap();
        assert_eq!(kc.to_yaml().unwrap(), GKE);
    }

    #[test]
    fn missing_and_null_sequences_read_as_empty() {
        let kc = KubeConfig::from_slice(b"current-context: a\nusers: null\n").unwrap();

        assert!(kc.clusters().is_empty());
        assert!(kc.contexts().is_empty());
        assert!(kc.users().is_empty());
        assert_eq!(kc.to_yaml().unwrap(), "current-context: a\nusers: null\n");
    }

    #[test]
    fn missing_and_null_keys_are_written_back_as_read() {
        let src = r#"contexts:
- context:
    cluster: c
  name: a
- context: null
  name: b
current-context: a
kind: Config
preferences: null
users:
- name: u
  user:
    exec:
      args: null
      command: x
      env: null
- name: v
"#;
        let kc = KubeConfig::from_slice(src.as_bytes()).unwrap();

        assert_eq!(kc.contexts()[0].cluster_label(), "c");
        assert_eq!(kc.contexts()[1].cluster_label(), "");
        assert_eq!(kc.to_yaml().unwrap(), src);
    }

    #[test]
    fn unmodelled_user_fields_survive() {
        let src = r#"current-context: a
users:
- name: eks
  user:
    exec:
      apiVersion: client.authentication.k8s.io/v1beta1
      args:
      - token
      - -i
      - prod
      command: aws-iam-authenticator
      env:
      - name: AWS_PROFILE
        value: prod
      interactiveMode: IfAvailable
      provideClusterInfo: false
    username: someone
"#;
        let kc = KubeConfig::from_slice(src.as_bytes()).unwrap();
        let user = value(&kc.users()[0].user).unwrap();
        let exec = value(&user.exec).unwrap();
        assert_eq!(text(&exec.command), Some("aws-iam-authenticator"));
        assert!(exec.extra.contains_key("interactiveMode"));
        assert!(user.extra.contains_key("username"));

        assert_eq!(kc.to_yaml().unwrap(), src);
    }

    #[test]
    fn context_lookup_takes_first_match() {
        let src = r#"contexts:
- context:
    cluster: first
  name: dup
- context:
    cluster: second
  name: dup
current-context: dup
"#;
        let kc = KubeConfig::from_slice(src.as_bytes()).unwrap();
        assert_eq!(kc.context("dup").unwrap().cluster_label(), "first");
        assert!(kc.context("other").is_none());
    }

    #[test]
    fn rejects_non_mapping_documents() {
        assert!(KubeConfig::from_slice(b"- just\n- a list\n").is_err());
        assert!(KubeConfig::from_slice(b"contexts: [unclosed").is_err());
        assert!(KubeConfig::from_slice(b"contexts: 7\n").is_err());
    }
}
