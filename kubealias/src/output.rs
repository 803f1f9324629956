//! Printed forms of a resolved context.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::{ResolvedContext, Result};

/// Compact JSON with a space after every `:` and `,`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serializes `value` as a single JSON line, e.g. `{"a": "b", "c": "d"}`.
pub fn to_line<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClusterOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_alias: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_name: Option<&'a str>,
}

/// Which parts of a [`ResolvedContext`] `get` prints, and how.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputFormat {
    pub alias: bool,
    pub name: bool,
    pub raw: bool,
}

impl OutputFormat {
    pub fn render(self, resolved: &ResolvedContext) -> Result<String> {
        let alias = resolved.alias.as_str();
        let cluster = resolved.cluster.as_str();

        // Selecting neither field is the same as selecting both.
        let (alias, cluster) = match (self.alias, self.name) {
            (true, false) => (Some(alias), None),
            (false, true) => (None, Some(cluster)),
            _ => (Some(alias), Some(cluster)),
        };

        if !self.raw {
            return to_line(&ClusterOutput {
                cluster_alias: alias,
                cluster_name: cluster,
            });
        }

        Ok(match (alias, cluster) {
            (Some(alias), Some(cluster)) => format!("{alias}\t{cluster}"),
            (Some(alias), None) => alias.to_owned(),
            (None, Some(cluster)) => cluster.to_owned(),
            (None, None) => String::new(),
        })
    }
}

impl ResolvedContext {
    /// `{"clusterAlias": ..., "clusterName": ...}`
    pub fn to_json_line(&self) -> Result<String> {
        OutputFormat::default().render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn resolved() -> ResolvedContext {
        ResolvedContext {
            alias: "ctx1".into(),
            cluster: "clusterA".into(),
        }
    }

    #[rstest]
    #[case(false, false, false, r#"{"clusterAlias": "ctx1", "clusterName": "clusterA"}"#)]
    #[case(true, true, false, r#"{"clusterAlias": "ctx1", "clusterName": "clusterA"}"#)]
    #[case(false, false, true, "ctx1\tclusterA")]
    #[case(true, true, true, "ctx1\tclusterA")]
    #[case(true, false, false, r#"{"clusterAlias": "ctx1"}"#)]
    #[case(true, false, true, "ctx1")]
    #[case(false, true, false, r#"{"clusterName": "clusterA"}"#)]
    #[case(false, true, true, "clusterA")]
    fn output_matrix(
        #[case] alias: bool,
        #[case] name: bool,
        #[case] raw: bool,
        #[case] expected: &str,
    ) {
        let format = OutputFormat { alias, name, raw };
        assert_eq!(format.render(&resolved()).unwrap(), expected);
    }

    #[test]
    fn escapes_json_strings() {
        let resolved = ResolvedContext {
            alias: "a\"b".into(),
            cluster: String::new(),
        };
        assert_eq!(
            resolved.to_json_line().unwrap(),
            r#"{"clusterAlias": "a\"b", "clusterName": ""}"#
        );
    }
}
