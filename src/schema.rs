//! Component document model.
//!
//! Every component ships a `config.yaml` following this schema; a user
//! override document uses the same shape with all fields optional.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Resolved configuration for one component.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ComponentConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    /// Environment variables to export (key-value).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Entries to add to PATH, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathEntry>,

    /// Shell aliases (name -> command).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, String>,

    /// Wrapper functions that call dotforge commands.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wrappers: Vec<Wrapper>,

    /// Raw shell functions for interactive code that can't be generated.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub shell_functions: BTreeMap<String, String>,

    /// Files to render through a format writer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileSpec>,

    /// Files to reconcile from the component's source directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sync_files: Vec<SyncFileSpec>,

    /// Tools this component installs.
    #[serde(default, skip_serializing_if = "InstallSpec::is_empty")]
    pub install: InstallSpec,
}

/// A path to add to PATH with an optional platform condition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathEntry {
    pub path: String,

    /// Platform filter: "darwin", "linux", or empty for all.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub condition: String,
}

/// A shell wrapper function delegating to a dotforge command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Wrapper {
    /// Shell function name.
    pub name: String,

    /// Command the function runs.
    pub command: String,

    /// Usage hint shown when called without arguments.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub usage: String,

    /// Default argument if none is provided.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_arg: String,

    /// Action after the command runs ("cd" to change directory).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub post_action: String,

    /// Show usage and fail when no argument is provided.
    #[serde(default)]
    pub requires_arg: bool,
}

/// Render these values in this format and place the result at this path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileSpec {
    /// Target path expression (supports `${VAR}`, `${VAR:-default}`, `~/`).
    pub target: String,

    /// Format writer name (e.g. "json", "raw", "iterm2").
    pub format: String,

    /// Semantic value tree handed to the writer.
    #[serde(default)]
    pub values: Value,
}

/// Reconcile one source file or directory against a target path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncFileSpec {
    /// Source path, relative to the component's own directory.
    pub source: String,

    /// Target path expression.
    pub target: String,

    pub mode: SyncMode,

    /// Merge-mode settings; ignored for other modes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeSpec>,
}

/// Reconciliation strategy for a sync directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Symlink target -> source.
    Symlink,
    /// Copy source bytes to target, recursing into directories.
    Copy,
    /// Combine the source document with a user file into a real target file.
    Merge,
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncMode::Symlink => write!(f, "symlink"),
            SyncMode::Copy => write!(f, "copy"),
            SyncMode::Merge => write!(f, "merge"),
        }
    }
}

/// Settings for merge-mode reconciliation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MergeSpec {
    /// User file holding local customizations (default: `<target>.local`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_file: Option<String>,

    #[serde(default)]
    pub strategy: MergeStrategy,

    /// Keys always taken from the user file, even when absent from the base.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preserve: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Recursively union nested objects.
    #[default]
    Deep,
    /// Override top-level keys wholesale.
    Shallow,
}

/// Tools a component installs, merged by tool name.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InstallSpec {
    #[serde(default)]
    pub tools: Vec<ToolInstall>,
}

impl InstallSpec {
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// One tool installation descriptor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolInstall {
    pub name: String,

    /// Command that exits zero when the tool is already present.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub check: String,

    /// Install command per platform ("darwin", "linux").
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub methods: BTreeMap<String, String>,

    /// Tools that must be installed first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,

    /// Message printed after installation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let yaml = r#"
            name: shell
            description: Core shell environment
        "#;

        let config: ComponentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "shell");
        assert!(config.env.is_empty());
        assert!(config.files.is_empty());
        assert!(config.install.is_empty());
    }

    #[test]
    fn test_parse_full_document() {
        let yaml = r#"
            name: demo
            description: Everything at once
            version: "1.2.0"
            env:
              EDITOR: nvim
            paths:
              - path: ~/.local/bin
              - path: /opt/homebrew/bin
                condition: darwin
            aliases:
              ll: ls -la
            wrappers:
              - name: dfgo
                command: dotforge go new
                post_action: cd
                requires_arg: true
            shell_functions:
              mkcd: "mkdir -p \"$1\" && cd \"$1\""
            files:
              - target: ~/.config/demo/settings.json
                format: json
                values:
                  theme: dark
            sync_files:
              - source: demorc
                target: ~/.demorc
                mode: symlink
              - source: settings.json
                target: ~/.demo/settings.json
                mode: merge
                merge:
                  strategy: deep
                  preserve: [workspace]
            install:
              tools:
                - name: demo
                  check: command -v demo
                  methods:
                    darwin: brew install demo
                    linux: apt-get install -y demo
        "#;

        let config: ComponentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.paths.len(), 2);
        assert_eq!(config.paths[1].condition, "darwin");
        assert_eq!(config.sync_files[0].mode, SyncMode::Symlink);

        let merge = config.sync_files[1].merge.as_ref().unwrap();
        assert_eq!(merge.strategy, MergeStrategy::Deep);
        assert_eq!(merge.preserve, vec!["workspace"]);
        assert_eq!(config.install.tools[0].methods["darwin"], "brew install demo");
    }

    #[test]
    fn test_merge_strategy_defaults_to_deep() {
        let yaml = r#"
            source: a.json
            target: ~/.a.json
            mode: merge
            merge: {}
        "#;

        let spec: SyncFileSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.merge.unwrap().strategy, MergeStrategy::Deep);
    }

    #[test]
    fn test_unknown_sync_mode_is_rejected() {
        let yaml = r#"
            source: a
            target: ~/.a
            mode: hardlink
        "#;

        let parsed: Result<SyncFileSpec, _> = serde_yaml::from_str(yaml);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_file_values_parse_as_json_tree() {
        let yaml = r#"
            target: ~/.config/x.json
            format: json
            values:
              nested:
                flag: true
                count: 3
        "#;

        let spec: FileSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.values["nested"]["count"], serde_json::json!(3));
    }
}
