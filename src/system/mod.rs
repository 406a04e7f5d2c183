pub mod resources;

pub use resources::*;

use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::env;
use std::fmt;

const NOT_SET: &str = "(not set)";

/// Host facts captured once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostSnapshot {
    /// Lowercase platform family, e.g. `linux`, `macos`
    pub os: String,

    /// Lowercase machine architecture, e.g. `x86_64`, `aarch64`
    pub arch: String,

    /// `$SHELL`, verbatim
    pub shell: Option<String>,

    /// `$HOME`, verbatim
    pub home: Option<String>,
}

impl HostSnapshot {
    /// Read platform constants and the `SHELL` / `HOME` variables
    pub fn capture() -> Self {
        Self {
            os: env::consts::OS.to_lowercase(),
            arch: env::consts::ARCH.to_lowercase(),
            shell: env_var("SHELL"),
            home: env_var("HOME"),
        }
    }

    fn fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("os", Some(self.os.as_str())),
            ("arch", Some(self.arch.as_str())),
            ("shell", self.shell.as_deref()),
            ("home", self.home.as_deref()),
        ]
    }

    /// Print for the terminal, optionally colored
    pub fn print(&self, color: bool) {
        if !color {
            print!("{}", self);
            return;
        }

        println!("{}", "Host =>".bright_blue().bold());
        for (name, value) in self.fields() {
            println!("{}: {}", name.green(), colored_value(value));
        }
    }
}

/// Absent values in yellow, everything else in cyan
fn colored_value(value: Option<&str>) -> ColoredString {
    match value {
        Some(value) => value.cyan(),
        None => NOT_SET.yellow(),
    }
}

/// Non-unicode values are treated as absent
fn env_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

impl fmt::Display for HostSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Host =>")?;
        for (name, value) in self.fields() {
            writeln!(f, "{}: {}", name, value.unwrap_or(NOT_SET))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_is_idempotent() {
        assert_eq!(HostSnapshot::capture(), HostSnapshot::capture());
    }

    #[test]
    fn os_and_arch_are_lowercase() {
        let snapshot = HostSnapshot::capture();
        assert_eq!(snapshot.os, snapshot.os.to_lowercase());
        assert_eq!(snapshot.arch, snapshot.arch.to_lowercase());
        assert!(!snapshot.os.is_empty());
        assert!(!snapshot.arch.is_empty());
    }

    #[test]
    fn renders_fields_in_fixed_order() {
        let snapshot = HostSnapshot {
            os: "linux".into(),
            arch: "x86_64".into(),
            shell: Some("/bin/zsh".into()),
            home: Some("/home/dev".into()),
        };

        assert_eq!(
            snapshot.to_string(),
            "Host =>\nos: linux\narch: x86_64\nshell: /bin/zsh\nhome: /home/dev\n"
        );
    }

    #[test]
    fn absent_values_render_as_not_set() {
        let snapshot = HostSnapshot {
            os: "linux".into(),
            arch: "aarch64".into(),
            shell: None,
            home: None,
        };

        let rendered = snapshot.to_string();
        assert!(rendered.contains("shell: (not set)\n"));
        assert!(rendered.contains("home: (not set)\n"));
    }

    #[test]
    fn colors_follow_presence_not_text() {
        use colored::Color;

        let absent = colored_value(None);
        assert_eq!(absent.fgcolor(), Some(Color::Yellow));
        assert_eq!(&*absent, NOT_SET);

        // A variable literally set to the placeholder text is still a value
        assert_eq!(colored_value(Some("(not set)")).fgcolor(), Some(Color::Cyan));
        assert_eq!(colored_value(Some("/bin/zsh")).fgcolor(), Some(Color::Cyan));
    }

    #[test]
    fn serializes_absent_values_as_null() {
        let snapshot = HostSnapshot {
            os: "macos".into(),
            arch: "aarch64".into(),
            shell: None,
            home: Some("/Users/dev".into()),
        };

        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["os"], "macos");
        assert!(json["shell"].is_null());
        assert_eq!(json["home"], "/Users/dev");
    }
}
