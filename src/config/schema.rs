use crate::executor::{CommandSpec, ExecutionOptions, Invocation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default, rename = "batch")]
    pub batches: Vec<BatchConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Interpreter for string commands; platform shell when unset
    #[serde(default)]
    pub shell: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub expect_success: bool,

    #[serde(default)]
    pub fail_fast: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shell: None,
            expect_success: default_true(),
            fail_fast: false,
        }
    }
}

impl Settings {
    pub fn shell(&self) -> PathBuf {
        self.shell
            .clone()
            .unwrap_or_else(ExecutionOptions::default_shell)
    }

    /// Base options every launch starts from
    pub fn execution_options(&self) -> ExecutionOptions {
        ExecutionOptions::default().with_shell(self.shell())
    }
}

/// A named, ordered group of commands run as one multi-command call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    pub name: String,

    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Overrides `settings.expect_success` for this batch
    #[serde(default)]
    pub expect_success: Option<bool>,

    #[serde(default)]
    pub cwd: Option<PathBuf>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub commands: Vec<Invocation>,
}

impl BatchConfig {
    pub fn expect_success(&self, settings: &Settings) -> bool {
        self.expect_success.unwrap_or(settings.expect_success)
    }

    pub fn execution_options(&self, settings: &Settings) -> ExecutionOptions {
        let mut options = settings.execution_options();
        options.cwd = self.cwd.clone();
        options.env.extend(self.env.clone());
        options
    }

    pub fn spec(&self) -> CommandSpec {
        CommandSpec::Sequence(self.commands.clone())
    }
}

impl Config {
    pub fn get_batch(&self, name: &str) -> Option<&BatchConfig> {
        self.batches.iter().find(|b| b.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.batches.is_empty());
        assert!(config.settings.expect_success);
        assert!(!config.settings.fail_fast);
        assert_eq!(config.settings.shell(), ExecutionOptions::default_shell());
    }

    #[test]
    fn parses_batches_with_mixed_command_forms() {
        let config: Config = toml::from_str(
            r#"
            [settings]
            shell = "/bin/bash"
            fail_fast = true

            [[batch]]
            name = "tools"
            commands = ["echo hi", ["ls", "-la"]]

            [[batch]]
            name = "dotfiles"
            depends_on = ["tools"]
            expect_success = false
            cwd = "/tmp"
            env = { FOO = "bar" }
            commands = ["true"]
            "#,
        )
        .unwrap();

        assert_eq!(config.settings.shell(), PathBuf::from("/bin/bash"));
        assert!(config.settings.fail_fast);

        let tools = config.get_batch("tools").unwrap();
        assert_eq!(
            tools.commands,
            vec![Invocation::shell("echo hi"), Invocation::argv(["ls", "-la"])]
        );
        assert!(tools.expect_success(&config.settings));

        let dotfiles = config.get_batch("dotfiles").unwrap();
        assert!(!dotfiles.expect_success(&config.settings));
        assert_eq!(dotfiles.depends_on, vec!["tools".to_string()]);

        let options = dotfiles.execution_options(&config.settings);
        assert_eq!(options.shell, PathBuf::from("/bin/bash"));
        assert_eq!(options.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(options.env.get("FOO").map(String::as_str), Some("bar"));
    }

    #[test]
    fn batch_spec_is_a_sequence() {
        let config: Config = toml::from_str(
            r#"
            [[batch]]
            name = "empty"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.get_batch("empty").unwrap().spec(),
            CommandSpec::Sequence(vec![])
        );
        assert!(config.get_batch("missing").is_none());
    }
}
