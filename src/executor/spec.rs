use serde::{Deserialize, Serialize};
use std::fmt;

/// One external command to launch as a child process
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Invocation {
    /// Command line handed to the shell interpreter (`sh -c <line>`)
    Shell(String),

    /// Program followed by its arguments, launched without a shell
    Argv(Vec<String>),
}

impl Invocation {
    pub fn shell(line: impl Into<String>) -> Self {
        Self::Shell(line.into())
    }

    pub fn argv<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Argv(args.into_iter().map(Into::into).collect())
    }

    /// True when there is nothing to launch
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Shell(line) => line.trim().is_empty(),
            Self::Argv(args) => args.first().map_or(true, |program| program.is_empty()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Shell(_) => "shell line",
            Self::Argv(_) => "argument vector",
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shell(line) => write!(f, "{}", line),
            Self::Argv(args) => write!(f, "{}", args.join(" ")),
        }
    }
}

/// What the caller hands to the runner: one invocation or an ordered batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    Single(Invocation),
    Sequence(Vec<Invocation>),
}

impl CommandSpec {
    /// Shape name used in usage errors and debug logs
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Single(_) => "single invocation",
            Self::Sequence(_) => "sequence",
        }
    }
}

impl From<Invocation> for CommandSpec {
    fn from(invocation: Invocation) -> Self {
        Self::Single(invocation)
    }
}

impl From<Vec<Invocation>> for CommandSpec {
    fn from(invocations: Vec<Invocation>) -> Self {
        Self::Sequence(invocations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_shell_line_is_empty() {
        assert!(Invocation::shell("").is_empty());
        assert!(Invocation::shell("   ").is_empty());
        assert!(!Invocation::shell("true").is_empty());
    }

    #[test]
    fn argv_without_program_is_empty() {
        assert!(Invocation::Argv(vec![]).is_empty());
        assert!(Invocation::argv(["", "-la"]).is_empty());
        assert!(!Invocation::argv(["ls", "-la"]).is_empty());
    }

    #[test]
    fn display_joins_argv() {
        assert_eq!(Invocation::argv(["echo", "a", "b"]).to_string(), "echo a b");
        assert_eq!(Invocation::shell("echo hi | wc -c").to_string(), "echo hi | wc -c");
    }

    #[test]
    fn deserializes_string_and_array_forms() {
        let parsed: Vec<Invocation> =
            serde_json::from_str(r#"["echo hi", ["ls", "-la"]]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Invocation::shell("echo hi"), Invocation::argv(["ls", "-la"])]
        );
    }
}
